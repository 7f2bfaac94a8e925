use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use budget_rollup::{run, utils, MalformedRowPolicy, RollupConfig};

#[derive(Parser, Debug)]
#[command(name = "budget-rollup", version)]
#[command(about = "Roll a flat budget ledger CSV up into a ministry/program/activity JSON tree")]
struct Args {
    /// Ledger CSV (header row + nine columns)
    input: PathBuf,

    /// Output JSON path [default: ./ontario.json]
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// What to do with malformed rows
    #[arg(long, value_enum)]
    on_malformed: Option<Policy>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Policy {
    Abort,
    Skip,
    Zero,
}

impl From<Policy> for MalformedRowPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Abort => MalformedRowPolicy::Abort,
            Policy::Skip => MalformedRowPolicy::Skip,
            Policy::Zero => MalformedRowPolicy::Zero,
        }
    }
}

fn main() -> Result<()> {
    utils::init_tracing();
    let args = Args::parse();

    // Defaults → config file → flags
    let mut config = match &args.config {
        Some(path) => RollupConfig::from_file(path)?,
        None => RollupConfig::default(),
    };
    if let Some(output) = args.output {
        config = config.with_output_path(output);
    }
    if let Some(policy) = args.on_malformed {
        config = config.with_policy(policy.into());
    }

    println!("📊 Budget Rollup");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("\n📂 Reading {}", args.input.display());
    println!("   malformed rows: {}", config.on_malformed.as_str());

    let summary = run(&args.input, &config)?;

    println!("\n✓ {}", summary.summary());
    if summary.unknown_account_rows > 0 {
        println!(
            "⚠️  {} rows had an account outside the eight categories (nodes kept, amounts dropped)",
            summary.unknown_account_rows
        );
    }
    println!("💾 Wrote {}", config.output_path.display());

    Ok(())
}
