// Budget Rollup - Core Library
// Flat budget ledger (CSV) → Ministry / Program / Activity / Subitem tree (JSON)

pub mod category;
pub mod config;
pub mod errors;
pub mod finalize;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod rollup;
pub mod tree;
pub mod utils;

// Re-export commonly used types
pub use category::AccountCategory;
pub use config::{MalformedRowPolicy, RollupConfig, DEFAULT_OUTPUT_PATH};
pub use errors::RowError;
pub use finalize::{compare_names, finalize, finalize_in_place, is_finalized};
pub use normalize::{parse_amount, LedgerRow, Normalizer};
pub use parser::{CsvLedgerParser, LedgerParser, RawRow, RowResult};
pub use pipeline::{aggregate_rows, rollup_file, run, write_tree};
pub use rollup::{accumulate, resolve, ResolvedPath, Rollup, RollupSummary};
pub use tree::{
    Accounts, Activity, Bucket, BudgetTree, Detail, Ministry, Node, NodeCounts, Program,
    Siblings, Subitem,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
