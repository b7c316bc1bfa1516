use crate::config::WalletLimits;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Process wallet load and transfer operations from CSV
#[derive(Parser, Debug)]
#[command(name = "wallet-engine")]
#[command(about = "Process wallet load and transfer operations", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing operation records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy to use
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    /// Number of operations per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of operations per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent owner partitions (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of partitions processing concurrently (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Smallest accepted per-operation amount
    #[arg(
        long = "min-amount",
        value_name = "AMOUNT",
        help = "Smallest accepted amount per operation (default: 1)"
    )]
    pub min_amount: Option<Decimal>,

    /// Largest accepted per-operation amount
    #[arg(
        long = "max-amount",
        value_name = "AMOUNT",
        help = "Largest accepted amount per operation (default: 10000)"
    )]
    pub max_amount: Option<Decimal>,

    /// Daily spending allowance per owner
    #[arg(
        long = "daily-limit",
        value_name = "AMOUNT",
        help = "Amount an owner may load or send per day (default: 1000)"
    )]
    pub daily_limit: Option<Decimal>,
}

/// Available processing strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Uses the provided values where present and the defaults
    /// otherwise; zero values are sanitized by `BatchConfig::new`.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create WalletLimits from CLI arguments
    ///
    /// Uses the provided values where present and the defaults
    /// otherwise; inconsistent combinations are sanitized by
    /// `WalletLimits::new`.
    pub fn to_wallet_limits(&self) -> WalletLimits {
        if self.min_amount.is_some() || self.max_amount.is_some() || self.daily_limit.is_some() {
            let default = WalletLimits::default();
            WalletLimits::new(
                self.min_amount.unwrap_or(default.min_amount),
                self.max_amount.unwrap_or(default.max_amount),
                self.daily_limit.unwrap_or(default.daily_limit),
            )
        } else {
            WalletLimits::default()
        }
    }
}

/// Parse command-line arguments
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
