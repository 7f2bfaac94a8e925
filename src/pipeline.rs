// 🚚 Pipeline - read → normalise → roll up → finalize → write
// All-or-nothing: the output file is written only after the whole ledger
// has been aggregated and serialised.

use crate::config::{MalformedRowPolicy, RollupConfig};
use crate::errors::RowError;
use crate::finalize::finalize;
use crate::normalize::Normalizer;
use crate::parser::{CsvLedgerParser, LedgerParser, RowResult};
use crate::rollup::{Rollup, RollupSummary};
use crate::tree::BudgetTree;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Aggregate parsed rows into a sorted tree, applying the malformed-row policy
pub fn aggregate_rows(
    rows: &[RowResult],
    config: &RollupConfig,
) -> Result<(BudgetTree, RollupSummary)> {
    let normalizer = Normalizer::from_config(config);
    let mut rollup = Rollup::new();
    rollup.record_read(rows.len());

    for result in rows {
        let raw = match result {
            Ok(raw) => raw,
            Err(err) => {
                // A row with the wrong shape cannot be placed in the tree
                reject(err, config.on_malformed)?;
                rollup.record_skipped();
                continue;
            }
        };

        match normalizer.normalize(raw) {
            Ok(row) => {
                rollup.apply_row(&row);
            }
            Err(err) => {
                reject(&err, config.on_malformed)?;
                if config.on_malformed == MalformedRowPolicy::Zero {
                    rollup.record_zeroed();
                    rollup.apply_row(&normalizer.normalize_with_amount(raw, 0.0));
                } else {
                    rollup.record_skipped();
                }
            }
        }
    }

    let (tree, summary) = rollup.finish();
    Ok((finalize(tree), summary))
}

/// Fail under `abort`, otherwise log and let the caller recover
fn reject(err: &RowError, policy: MalformedRowPolicy) -> Result<()> {
    if policy == MalformedRowPolicy::Abort {
        return Err(anyhow::Error::new(err.clone()).context("Malformed ledger row"));
    }

    warn!(line = err.line(), policy = policy.as_str(), "{}", err);
    Ok(())
}

/// Serialise the tree and write it in one go
pub fn write_tree(tree: &BudgetTree, output_path: &Path) -> Result<()> {
    let json = tree.to_json_pretty().context("Failed to serialize budget tree")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))
}

/// Full run with an explicit configuration
pub fn run(input_path: &Path, config: &RollupConfig) -> Result<RollupSummary> {
    let parser = CsvLedgerParser::new();

    info!(
        input = %input_path.display(),
        output = %config.output_path.display(),
        parser = parser.name(),
        "starting rollup"
    );

    let rows = parser.parse(input_path)?;
    let (tree, summary) = aggregate_rows(&rows, config)?;
    write_tree(&tree, &config.output_path)?;

    info!(
        rows = summary.rows_read,
        ministries = summary.ministries,
        "wrote {}",
        config.output_path.display()
    );

    Ok(summary)
}

/// Read the ledger at `input_path` and write the JSON tree to `output_path`
/// (default `./ontario.json`)
pub fn rollup_file(input_path: &Path, output_path: Option<&Path>) -> Result<RollupSummary> {
    let mut config = RollupConfig::default();
    if let Some(path) = output_path {
        config = config.with_output_path(path);
    }

    run(input_path, &config)
}

// ============================================================================
// TESTS
// ============================================================================
