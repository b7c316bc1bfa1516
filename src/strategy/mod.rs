//! Processing strategy module for wallet operation processing
//!
//! This module defines the Strategy pattern for complete operation
//! processing pipelines, encompassing CSV parsing, engine wiring and
//! execution. This allows different processing implementations
//! (synchronous, asynchronous batch) to be selected at runtime.

use crate::cli::StrategyType;
use crate::config::WalletLimits;
use crate::core::WalletEngine;
use crate::types::{OperationRecord, OperationType, WalletError};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete operation pipelines
///
/// Each strategy reads operation records from a CSV file, drives them
/// through a freshly wired engine, and writes the final wallet states
/// to the output.
///
/// Fatal errors (file not found, I/O failure) are returned; individual
/// operation rejections are logged and processing continues with the
/// next record.
pub trait ProcessingStrategy: Send + Sync {
    /// Process operations from the input file and write wallet states
    ///
    /// # Errors
    ///
    /// Returns a message describing the fatal error that stopped the
    /// pipeline.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Run one operation record through the engine
///
/// A transfer record without a recipient cannot come out of the CSV
/// conversion, but the case is still answered with an error rather than
/// a panic.
pub(crate) fn run_operation(
    engine: &WalletEngine,
    record: &OperationRecord,
) -> Result<(), WalletError> {
    match record.op {
        OperationType::Load => engine
            .load_money(record.owner, record.amount, &record.key)
            .map(|_| ()),
        OperationType::Transfer => match record.recipient {
            Some(recipient) => engine
                .transfer_money(record.owner, recipient, record.amount, &record.key)
                .map(|_| ()),
            None => Err(WalletError::recipient_not_found(record.owner)),
        },
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// Selects and instantiates the appropriate implementation at runtime.
/// The batch configuration only applies to the async strategy and is
/// ignored otherwise.
pub fn create_strategy(
    strategy_type: StrategyType,
    limits: WalletLimits,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(limits)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(limits, config))
        }
    }
}
