use thiserror::Error;

/// Row-level failures raised while reading or normalising the ledger.
///
/// What happens to a failing row is decided by
/// [`MalformedRowPolicy`](crate::config::MalformedRowPolicy).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: amount {raw:?} is not a number")]
    MalformedAmount { line: usize, raw: String },
}

impl RowError {
    /// Input line the error refers to
    pub fn line(&self) -> usize {
        match self {
            RowError::FieldCount { line, .. } => *line,
            RowError::MalformedAmount { line, .. } => *line,
        }
    }
}
