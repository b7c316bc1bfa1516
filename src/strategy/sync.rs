//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of
//! the ProcessingStrategy trait. It orchestrates processing by
//! coordinating between the SyncReader (for CSV input) and the
//! WalletEngine (for the business logic).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Operation execution to `WalletEngine`
//! - CSV output to `csv_format::write_wallets_csv`
//!
//! Records stream through one at a time; memory usage is bounded by the
//! number of wallets and ledger rows, not the input size.
//!
//! # Owner registration
//!
//! Every record registers its initiating owner in the user directory
//! before executing, so an owner becomes transfer-addressable once it
//! has initiated at least one earlier operation. Transfers to ids that
//! never initiated anything are rejected by the engine.

use crate::config::WalletLimits;
use crate::core::{
    InMemoryDirectory, LimitPolicy, RetryPolicy, TransactionLedger, UserDirectory, WalletEngine,
    WalletStore,
};
use crate::io::csv_format::write_wallets_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{run_operation, ProcessingStrategy};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Synchronous processing strategy
///
/// Wires a fresh engine per run and drives operations through it in
/// input order.
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    limits: WalletLimits,
}

impl SyncProcessingStrategy {
    /// Create a new SyncProcessingStrategy over the given limits
    pub fn new(limits: WalletLimits) -> Self {
        Self { limits }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process operations from the input file and write wallet states
    ///
    /// Fatal errors (file not found, output failure) are returned.
    /// Individual operation rejections are logged and processing
    /// continues with the next record.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let store = Arc::new(WalletStore::new());
        let ledger = Arc::new(TransactionLedger::new());
        let directory = Arc::new(InMemoryDirectory::new());

        let engine = WalletEngine::new(
            Arc::clone(&store),
            Arc::clone(&ledger),
            Arc::clone(&directory) as Arc<dyn UserDirectory>,
            LimitPolicy::new(self.limits.clone()),
            RetryPolicy::default(),
        );

        let reader = SyncReader::new(input_path)?;

        for result in reader {
            match result {
                Ok(record) => {
                    directory.register(record.owner);
                    if let Err(e) = run_operation(&engine, &record) {
                        warn!(key = %record.key, "operation rejected: {}", e);
                    }
                }
                Err(e) => {
                    warn!("CSV parsing error: {}", e);
                }
            }
        }

        write_wallets_csv(&store.all_wallets(), output)
    }
}
