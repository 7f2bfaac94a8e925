// ⚙️ Rollup Configuration
// Defaults → optional JSON file → CLI flags (applied by the binary)

use crate::normalize::{DEFAULT_AMOUNT_PLACEHOLDER, DEFAULT_NO_VALUE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_PATH: &str = "./ontario.json";

// ============================================================================
// MALFORMED ROW POLICY
// ============================================================================

/// What to do with a row whose field count or amount is unusable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Fail the whole run, nothing is written
    #[default]
    Abort,

    /// Drop the row before any node is created
    Skip,

    /// Keep the row with amount 0 (rows with a wrong field count are dropped)
    Zero,
}

impl MalformedRowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MalformedRowPolicy::Abort => "abort",
            MalformedRowPolicy::Skip => "skip",
            MalformedRowPolicy::Zero => "zero",
        }
    }
}

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupConfig {
    /// Where the JSON tree is written
    pub output_path: PathBuf,

    pub on_malformed: MalformedRowPolicy,

    /// Marks a subitem or detail as not applicable
    pub no_value_sentinel: String,

    /// Amount text that means "no value" (counted as 0)
    pub amount_placeholder: String,
}

impl Default for RollupConfig {
    fn default() -> Self {
        RollupConfig {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            on_malformed: MalformedRowPolicy::default(),
            no_value_sentinel: DEFAULT_NO_VALUE.to_string(),
            amount_placeholder: DEFAULT_AMOUNT_PLACEHOLDER.to_string(),
        }
    }
}

impl RollupConfig {
    /// Load config from a JSON file; missing keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Builder: override the output path
    pub fn with_output_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_path = path.into();
        self
    }

    /// Builder: override the malformed-row policy
    pub fn with_policy(mut self, policy: MalformedRowPolicy) -> Self {
        self.on_malformed = policy;
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RollupConfig::default();

        assert_eq!(config.output_path, PathBuf::from("./ontario.json"));
        assert_eq!(config.on_malformed, MalformedRowPolicy::Abort);
        assert_eq!(config.no_value_sentinel, "No Value");
        assert_eq!(config.amount_placeholder, "-");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RollupConfig = serde_json::from_str(r#"{"on_malformed": "skip"}"#).unwrap();

        assert_eq!(config.on_malformed, MalformedRowPolicy::Skip);
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"output_path": "out/tree.json", "on_malformed": "zero", "no_value_sentinel": "N/A"}}"#
        )
        .unwrap();

        let config = RollupConfig::from_file(file.path()).unwrap();

        assert_eq!(config.output_path, PathBuf::from("out/tree.json"));
        assert_eq!(config.on_malformed, MalformedRowPolicy::Zero);
        assert_eq!(config.no_value_sentinel, "N/A");
        assert_eq!(config.amount_placeholder, "-");
    }

    #[test]
    fn test_from_file_errors() {
        assert!(RollupConfig::from_file("/nonexistent/rollup.json").is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(RollupConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_builders() {
        let config = RollupConfig::default()
            .with_output_path("x.json")
            .with_policy(MalformedRowPolicy::Skip);

        assert_eq!(config.output_path, PathBuf::from("x.json"));
        assert_eq!(config.on_malformed.as_str(), "skip");
    }
}
