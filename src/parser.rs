// 🏗️ Ledger Parser - CSV → raw rows
// Positional nine-column budget ledger, header row skipped

use crate::errors::RowError;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of positional fields in a ledger row
pub const FIELD_COUNT: usize = 9;

// ============================================================================
// CORE TYPES
// ============================================================================

/// RawRow - one ledger line exactly as read, before normalisation
///
/// Column order: year, amount, ministry, category, program, activity,
/// subitem, account, details.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub year: String,
    pub amount: String,
    pub ministry: String,
    /// Read but never used for aggregation
    pub category: String,
    pub program: String,
    pub activity: String,
    pub subitem: String,
    pub account: String,
    pub details: String,

    // Provenance
    pub line_number: usize,
}

impl RawRow {
    /// Build from a record's fields in column order; missing fields are empty
    pub fn from_fields<'a, I>(fields: I, line_number: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut it = fields.into_iter().map(str::to_string);
        let mut next = || it.next().unwrap_or_default();

        RawRow {
            year: next(),
            amount: next(),
            ministry: next(),
            category: next(),
            program: next(),
            activity: next(),
            subitem: next(),
            account: next(),
            details: next(),
            line_number,
        }
    }
}

/// Result of reading one record: a raw row or the reason it is unusable
pub type RowResult = std::result::Result<RawRow, RowError>;

// ============================================================================
// PARSER TRAIT
// ============================================================================

/// LedgerParser - turns an input file into raw rows
///
/// File-level failures (missing file, broken quoting) are fatal and come back
/// as `Err`. Row-level problems are returned inline so the caller can apply
/// its malformed-row policy.
pub trait LedgerParser {
    /// Parse a whole file
    fn parse(&self, file_path: &Path) -> Result<Vec<RowResult>>;

    /// Short name for logs
    fn name(&self) -> &str;
}

// ============================================================================
// CSV PARSER
// ============================================================================

/// Comma-separated ledger with a header row
pub struct CsvLedgerParser;

impl CsvLedgerParser {
    pub fn new() -> Self {
        CsvLedgerParser
    }

    /// Parse from any reader (files, in-memory buffers in tests)
    pub fn parse_reader<R: Read>(&self, reader: R, source: &str) -> Result<Vec<RowResult>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let record = result.with_context(|| {
                format!("Failed to parse CSV record {} in {}", index + 1, source)
            })?;

            // 1-indexed + header row when the reader has no position
            let line_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(index + 2);

            if record.len() != FIELD_COUNT {
                rows.push(Err(RowError::FieldCount {
                    line: line_number,
                    expected: FIELD_COUNT,
                    found: record.len(),
                }));
                continue;
            }

            rows.push(Ok(RawRow::from_fields(record.iter(), line_number)));
        }

        Ok(rows)
    }
}

impl Default for CsvLedgerParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerParser for CsvLedgerParser {
    fn parse(&self, file_path: &Path) -> Result<Vec<RowResult>> {
        let file = File::open(file_path)
            .with_context(|| format!("Failed to open file: {}", file_path.display()))?;

        self.parse_reader(file, &file_path.display().to_string())
    }

    fn name(&self) -> &str {
        "csv"
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Year,Amount,Ministry,Category,Program,Activity,Sub Item,Account,Details\n";

    fn parse(body: &str) -> Vec<RowResult> {
        let text = format!("{}{}", HEADER, body);
        CsvLedgerParser::new()
            .parse_reader(text.as_bytes(), "test.csv")
            .unwrap()
    }

    #[test]
    fn test_parse_positional_fields() {
        let rows = parse("2024,\"1,000\",Health,Op,Admin,Ops,,Salaries and Wages,\n");

        assert_eq!(rows.len(), 1);
        let row = rows[0].as_ref().unwrap();
        assert_eq!(row.year, "2024");
        assert_eq!(row.amount, "1,000");
        assert_eq!(row.ministry, "Health");
        assert_eq!(row.category, "Op");
        assert_eq!(row.program, "Admin");
        assert_eq!(row.activity, "Ops");
        assert_eq!(row.subitem, "");
        assert_eq!(row.account, "Salaries and Wages");
        assert_eq!(row.details, "");
        assert_eq!(row.line_number, 2);
    }

    #[test]
    fn test_header_is_skipped() {
        let rows = parse("");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = "Year,Amount,Ministry,Category,Program,Activity,Sub Item,Account,Details\r\n\
                    2024,5,Health,Op,Admin,Ops,,Services,\r\n\
                    2024,6,Health,Op,Admin,Ops,,Services,\r\n";
        let rows = CsvLedgerParser::new()
            .parse_reader(text.as_bytes(), "crlf.csv")
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].as_ref().unwrap().amount, "6");
        assert_eq!(rows[1].as_ref().unwrap().details, "");
    }

    #[test]
    fn test_wrong_field_count_is_reported() {
        let rows = parse("2024,5,Health,Op,Admin,Ops,,Services,\n2024,5,Health\n");

        assert!(rows[0].is_ok());
        assert_eq!(
            rows[1],
            Err(RowError::FieldCount {
                line: 3,
                expected: FIELD_COUNT,
                found: 3
            })
        );
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = CsvLedgerParser::new().parse(Path::new("/nonexistent/ledger.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_fields_pads_missing() {
        let row = RawRow::from_fields(vec!["2024", "7"], 9);
        assert_eq!(row.amount, "7");
        assert_eq!(row.details, "");
        assert_eq!(row.line_number, 9);
    }
}
