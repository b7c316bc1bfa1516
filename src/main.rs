//! Wallet Engine CLI
//!
//! Command-line interface for processing wallet operations from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > wallets.csv
//! cargo run -- --strategy sync operations.csv > wallets.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 operations.csv > wallets.csv
//! cargo run -- --daily-limit 5000 operations.csv > wallets.csv
//! ```
//!
//! The program reads operation records from the input CSV file, runs
//! them through the wallet engine using the selected processing
//! strategy, and writes the final wallet states to stdout. Logs go to
//! stderr (controlled with `RUST_LOG`), so redirecting stdout captures
//! clean CSV.
//!
//! # Processing Strategies
//!
//! - **sync**: single-threaded streaming processing
//! - **async**: batched processing with per-owner parallelism (default)
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use std::process;
use tracing_subscriber::EnvFilter;
use wallet_engine::cli;
use wallet_engine::strategy;

fn main() {
    // Logs to stderr so stdout stays valid CSV
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let limits = args.to_wallet_limits();
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, limits, config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
