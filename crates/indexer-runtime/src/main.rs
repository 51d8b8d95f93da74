//! # Inscription Indexer
//!
//! Reads newline-delimited envelopes from `IX_INPUT` (or stdin), validates
//! and applies them against an in-memory ledger, and logs a summary.
//!
//! ## Startup Sequence
//!
//! 1. Install the tracing subscriber (`RUST_LOG`, default `info`)
//! 2. Load configuration (file, then environment)
//! 3. Run the input through the sequencer
//! 4. Log the summary; exit non-zero if a lane halted

use std::fs::File;
use std::io::BufReader;

use anyhow::{bail, Context, Result};
use indexer_runtime::{IndexerRuntime, RuntimeConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RuntimeConfig::load()?;
    info!(
        max_batch_size = config.sequencer.max_batch_size,
        parallel_lanes = config.sequencer.parallel_lanes,
        enforce_withdraw_balance = config.validator.enforce_withdraw_balance,
        "Starting inscription indexer"
    );

    let runtime = IndexerRuntime::new(&config);
    let summary = match &config.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening input {}", path.display()))?;
            runtime.run(BufReader::new(file))?
        }
        None => runtime.run(std::io::stdin().lock())?,
    };
    summary.log();

    if !summary.is_complete() {
        bail!(
            "{} lane(s) halted on ledger failure; {} operation(s) pending",
            summary.halted_lanes,
            summary.pending.len()
        );
    }
    Ok(())
}
