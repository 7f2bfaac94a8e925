// 🧹 Row Normalizer - raw strings → typed ledger rows
// Trims names, parses amounts, resolves the account category,
// and applies the "No Value" presence rule to subitems and details.

use crate::category::AccountCategory;
use crate::config::RollupConfig;
use crate::errors::RowError;
use crate::parser::RawRow;

pub const DEFAULT_NO_VALUE: &str = "No Value";
pub const DEFAULT_AMOUNT_PLACEHOLDER: &str = "-";

// ============================================================================
// LEDGER ROW
// ============================================================================

/// LedgerRow - a normalised row ready for aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub year: String,
    pub amount: f64,
    pub ministry: String,
    pub program: String,
    pub activity: String,

    /// None when empty or the "No Value" sentinel
    pub subitem: Option<String>,

    /// None when the label is outside the eight fixed categories
    pub account: Option<AccountCategory>,

    /// Original label, kept for reporting unknown accounts
    pub account_label: String,

    /// None when empty or the "No Value" sentinel
    pub detail: Option<String>,

    pub line_number: usize,
}

// ============================================================================
// AMOUNT PARSING
// ============================================================================

/// Parse a ledger amount
///
/// - the placeholder (a single dash) and the empty string mean 0
/// - comma grouping separators are stripped: "1,234.50" → 1234.50
/// - negatives are kept: "-500" → -500
///
/// Returns None when the cleaned text is not a finite decimal.
pub fn parse_amount(raw: &str, placeholder: &str) -> Option<f64> {
    let trimmed = raw.trim();

    if trimmed == placeholder || trimmed.is_empty() {
        return Some(0.0);
    }

    let cleaned = trimmed.replace(',', "");

    // Rust accepts "inf"/"nan" spellings, the ledger never does
    if !cleaned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ============================================================================
// NORMALIZER
// ============================================================================

pub struct Normalizer {
    no_value_sentinel: String,
    amount_placeholder: String,
}

impl Normalizer {
    /// Normalizer with the default sentinels
    pub fn new() -> Self {
        Normalizer {
            no_value_sentinel: DEFAULT_NO_VALUE.to_string(),
            amount_placeholder: DEFAULT_AMOUNT_PLACEHOLDER.to_string(),
        }
    }

    pub fn from_config(config: &RollupConfig) -> Self {
        Normalizer {
            no_value_sentinel: config.no_value_sentinel.clone(),
            amount_placeholder: config.amount_placeholder.clone(),
        }
    }

    /// Normalise a row, failing on an unparseable amount
    pub fn normalize(&self, raw: &RawRow) -> Result<LedgerRow, RowError> {
        let amount = parse_amount(&raw.amount, &self.amount_placeholder).ok_or_else(|| {
            RowError::MalformedAmount {
                line: raw.line_number,
                raw: raw.amount.clone(),
            }
        })?;

        Ok(self.normalize_with_amount(raw, amount))
    }

    /// Normalise a row with an amount supplied by the caller
    pub fn normalize_with_amount(&self, raw: &RawRow, amount: f64) -> LedgerRow {
        LedgerRow {
            year: raw.year.trim().to_string(),
            amount,
            ministry: raw.ministry.trim().to_string(),
            program: raw.program.trim().to_string(),
            activity: raw.activity.trim().to_string(),
            subitem: self.present(&raw.subitem),
            account: AccountCategory::from_label(&raw.account),
            account_label: raw.account.trim().to_string(),
            detail: self.present(&raw.details),
            line_number: raw.line_number,
        }
    }

    /// Trimmed value, or None for empty / sentinel.
    /// The sentinel is matched after trimming, so " No Value " and "  " are absent.
    fn present(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == self.no_value_sentinel {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(amount: &str, subitem: &str, account: &str, details: &str) -> RawRow {
        RawRow {
            year: "2024-25".to_string(),
            amount: amount.to_string(),
            ministry: "  Health ".to_string(),
            category: "Operating".to_string(),
            program: "Admin".to_string(),
            activity: " Ops".to_string(),
            subitem: subitem.to_string(),
            account: account.to_string(),
            details: details.to_string(),
            line_number: 2,
        }
    }

    #[test]
    fn test_parse_amount_placeholder() {
        assert_eq!(parse_amount("-", "-"), Some(0.0));
        assert_eq!(parse_amount(" - ", "-"), Some(0.0));
        assert_eq!(parse_amount("", "-"), Some(0.0));
    }

    #[test]
    fn test_parse_amount_thousands() {
        assert_eq!(parse_amount("1,234.50", "-"), Some(1234.50));
        assert_eq!(parse_amount("12,345,678", "-"), Some(12_345_678.0));
    }

    #[test]
    fn test_parse_amount_negative() {
        assert_eq!(parse_amount("-500", "-"), Some(-500.0));
        assert_eq!(parse_amount("-1,000.25", "-"), Some(-1000.25));
    }

    #[test]
    fn test_parse_amount_malformed() {
        assert_eq!(parse_amount("abc", "-"), None);
        assert_eq!(parse_amount("12..5", "-"), None);
        assert_eq!(parse_amount("NaN", "-"), None);
        assert_eq!(parse_amount("inf", "-"), None);
        assert_eq!(parse_amount("$45", "-"), None);
    }

    #[test]
    fn test_normalize_trims_names() {
        let row = Normalizer::new()
            .normalize(&raw("1,000", "", "Salaries and Wages", ""))
            .unwrap();

        assert_eq!(row.ministry, "Health");
        assert_eq!(row.activity, "Ops");
        assert_eq!(row.amount, 1000.0);
        assert_eq!(row.account, Some(AccountCategory::SalariesAndWages));
    }

    #[test]
    fn test_subitem_suppression() {
        let normalizer = Normalizer::new();

        assert_eq!(normalizer.normalize(&raw("1", "", "Services", "")).unwrap().subitem, None);
        assert_eq!(
            normalizer.normalize(&raw("1", "No Value", "Services", "")).unwrap().subitem,
            None
        );
        assert_eq!(
            normalizer.normalize(&raw("1", " Clinics ", "Services", "")).unwrap().subitem,
            Some("Clinics".to_string())
        );
    }

    #[test]
    fn test_detail_suppression() {
        let normalizer = Normalizer::new();

        assert_eq!(
            normalizer.normalize(&raw("1", "", "Services", "No Value")).unwrap().detail,
            None
        );
        assert_eq!(
            normalizer.normalize(&raw("1", "", "Services", "Legal fees ")).unwrap().detail,
            Some("Legal fees".to_string())
        );
    }

    #[test]
    fn test_padded_sentinel_and_blank_are_absent() {
        let normalizer = Normalizer::new();

        let row = normalizer
            .normalize(&raw("1", " No Value ", "Services", " No Value "))
            .unwrap();
        assert_eq!(row.subitem, None);
        assert_eq!(row.detail, None);

        let row = normalizer.normalize(&raw("1", "   ", "Services", "  ")).unwrap();
        assert_eq!(row.subitem, None);
        assert_eq!(row.detail, None);
    }

    #[test]
    fn test_padded_account_label_is_unknown() {
        let row = Normalizer::new()
            .normalize(&raw("10", "", "Services ", ""))
            .unwrap();

        assert_eq!(row.account, None);
        assert_eq!(row.account_label, "Services");
    }

    #[test]
    fn test_unknown_account_keeps_label() {
        let row = Normalizer::new()
            .normalize(&raw("10", "", "Capital Assets", ""))
            .unwrap();

        assert_eq!(row.account, None);
        assert_eq!(row.account_label, "Capital Assets");
    }

    #[test]
    fn test_malformed_amount_error() {
        let err = Normalizer::new()
            .normalize(&raw("twelve", "", "Services", ""))
            .unwrap_err();

        assert_eq!(
            err,
            RowError::MalformedAmount {
                line: 2,
                raw: "twelve".to_string()
            }
        );
    }

    #[test]
    fn test_custom_sentinels() {
        let config = RollupConfig {
            no_value_sentinel: "N/A".to_string(),
            amount_placeholder: "--".to_string(),
            ..RollupConfig::default()
        };
        let normalizer = Normalizer::from_config(&config);

        let row = normalizer.normalize(&raw("--", "N/A", "Services", "")).unwrap();
        assert_eq!(row.amount, 0.0);
        assert_eq!(row.subitem, None);

        // Default sentinel is now an ordinary name
        let row = normalizer.normalize(&raw("1", "No Value", "Services", "")).unwrap();
        assert_eq!(row.subitem, Some("No Value".to_string()));
    }
}
