//! Asynchronous batch processing strategy
//!
//! This module provides a concurrent implementation of the
//! ProcessingStrategy trait. Operations are read in batches and fanned
//! out across worker tasks, partitioned by initiating owner.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig   (batch_size, max_concurrent_batches)
//!     ├── AsyncReader   (batched CSV reading)
//!     ├── BatchProcessor (owner partitioning + task fan-out)
//!     └── WalletEngine  (thread-safe mutation engine)
//! ```
//!
//! # Concurrency model
//!
//! Batches run sequentially so an owner's operations keep their input
//! order across the whole file. Within a batch, each initiating owner's
//! operations run on their own task, in order. Transfers from different
//! tasks may still target the same recipient wallet; those races are
//! resolved by the engine's compare-and-swap commits and retry loop,
//! not by partitioning. Engine attempts block their worker thread
//! (including the retry backoff), so the runtime is sized with one
//! thread per concurrent partition.

use crate::config::WalletLimits;
use crate::core::{
    InMemoryDirectory, LimitPolicy, RetryPolicy, TransactionLedger, UserDirectory, WalletEngine,
    WalletStore,
};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_wallets_csv;
use crate::strategy::{run_operation, ProcessingStrategy};
use crate::types::{OperationRecord, OwnerId, WalletError};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Configuration for batch processing
///
/// Controls how many operations are read per batch and how many worker
/// threads the runtime gets for parallel processing within each batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of operations per batch
    pub batch_size: usize,
    /// Maximum number of owner partitions processing concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            eprintln!(
                "Warning: Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            eprintln!(
                "Warning: Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches, default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Outcome of one processed operation
#[derive(Debug, Clone)]
pub struct OperationOutcome {
    /// The operation that was executed
    pub record: OperationRecord,

    /// How the engine answered it
    pub result: Result<(), WalletError>,
}

/// Batch processor with owner-based partitioning
///
/// Partitions a batch by initiating owner and runs each partition on
/// its own task, preserving per-owner input order.
#[derive(Clone)]
pub struct BatchProcessor {
    engine: Arc<WalletEngine>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor over a shared engine
    pub fn new(engine: Arc<WalletEngine>) -> Self {
        Self { engine }
    }

    /// Partition a batch by initiating owner, preserving record order
    ///
    /// Every record lands in exactly one partition; records of one owner
    /// keep their relative order.
    pub fn partition_by_owner(
        &self,
        batch: Vec<OperationRecord>,
    ) -> HashMap<OwnerId, Vec<OperationRecord>> {
        let mut partitions: HashMap<OwnerId, Vec<OperationRecord>> = HashMap::new();

        for record in batch {
            partitions.entry(record.owner).or_default().push(record);
        }

        partitions
    }

    /// Process one batch, fanning owner partitions out across tasks
    ///
    /// Waits for every partition before returning, so the caller can
    /// start the next batch knowing all earlier operations are done.
    /// Rejected operations are logged and reported in the outcomes; they
    /// never abort the batch.
    pub async fn process_batch(&self, batch: Vec<OperationRecord>) -> Vec<OperationOutcome> {
        let partitions = self.partition_by_owner(batch);
        let mut tasks = Vec::with_capacity(partitions.len());

        for (_owner, records) in partitions {
            let engine = Arc::clone(&self.engine);
            tasks.push(tokio::spawn(async move {
                let mut outcomes = Vec::with_capacity(records.len());
                for record in records {
                    let result = run_operation(&engine, &record);
                    if let Err(e) = &result {
                        warn!(key = %record.key, "operation rejected: {}", e);
                    }
                    outcomes.push(OperationOutcome { record, result });
                }
                outcomes
            }));
        }

        let mut all_outcomes = Vec::new();
        for task in tasks {
            match task.await {
                Ok(outcomes) => all_outcomes.extend(outcomes),
                Err(e) => warn!("worker task failed: {}", e),
            }
        }
        all_outcomes
    }
}

/// Asynchronous batch processing strategy
///
/// Reads operations in batches and processes them concurrently per
/// initiating owner. Contended wallets (shared transfer recipients) are
/// handled by the engine's optimistic concurrency control.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    limits: WalletLimits,
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy
    pub fn new(limits: WalletLimits, config: BatchConfig) -> Self {
        Self { limits, config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process operations from the input file and write wallet states
    ///
    /// Builds a tokio multi-threaded runtime, wires a fresh engine, and
    /// pumps batches through the BatchProcessor. Every initiating owner
    /// in a batch is registered in the directory before the batch runs,
    /// so transfers may address any owner that initiated an operation in
    /// the same or an earlier batch.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let store = Arc::new(WalletStore::new());
            let ledger = Arc::new(TransactionLedger::new());
            let directory = Arc::new(InMemoryDirectory::new());

            let engine = Arc::new(WalletEngine::new(
                Arc::clone(&store),
                Arc::clone(&ledger),
                Arc::clone(&directory) as Arc<dyn UserDirectory>,
                LimitPolicy::new(self.limits.clone()),
                RetryPolicy::default(),
            ));

            let processor = BatchProcessor::new(Arc::clone(&engine));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            // Batches run back to back so per-owner ordering holds across
            // the whole file
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for record in &batch {
                    directory.register(record.owner);
                }

                let _outcomes = processor.process_batch(batch).await;
            }

            write_wallets_csv(&store.all_wallets(), output)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn process_with(config: BatchConfig, content: &str) -> String {
        let file = create_temp_csv(content);
        let strategy = AsyncProcessingStrategy::new(WalletLimits::default(), config);
        let mut output = Vec::new();
        strategy.process(file.path(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_async_strategy_processes_loads_for_multiple_owners() {
        let output = process_with(
            BatchConfig::default(),
            "op,owner,recipient,amount,key\n\
             load,1,,100.0,txn-1\n\
             load,2,,200.0,txn-2\n\
             load,1,,50.0,txn-3\n",
        );

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "1,150.0,150.0,false,2");
        assert_eq!(lines[2], "2,200.0,200.0,false,1");
    }

    #[test]
    fn test_async_strategy_transfers_across_partitions() {
        // Senders 1 and 2 run on different tasks and both credit owner 3;
        // the engine's CAS commits keep the fan-in consistent
        let output = process_with(
            BatchConfig::default(),
            "op,owner,recipient,amount,key\n\
             load,1,,100.0,txn-1\n\
             load,2,,100.0,txn-2\n\
             load,3,,10.0,txn-3\n\
             transfer,1,3,40.0,txn-4\n\
             transfer,2,3,60.0,txn-5\n",
        );

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "1,60.0,140.0,false,2");
        assert_eq!(lines[2], "2,40.0,160.0,false,2");
        assert!(lines[3].starts_with("3,110.0,10.0,false,"));
    }

    #[test]
    fn test_async_strategy_preserves_owner_order_across_batches() {
        // Batch size 2 splits owner 1's operations over three batches;
        // the final balance only works out if they ran in input order
        let output = process_with(
            BatchConfig::new(2, num_cpus::get()),
            "op,owner,recipient,amount,key\n\
             load,1,,100.0,txn-1\n\
             load,2,,50.0,txn-2\n\
             transfer,1,2,80.0,txn-3\n\
             load,2,,25.0,txn-4\n\
             transfer,1,2,20.0,txn-5\n",
        );

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "1,0.0,200.0,false,3");
        assert_eq!(lines[2], "2,175.0,75.0,false,4");
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy =
            AsyncProcessingStrategy::new(WalletLimits::default(), BatchConfig::default());
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[tokio::test]
    async fn test_partition_by_owner_keeps_per_owner_order() {
        let store = Arc::new(WalletStore::new());
        let ledger = Arc::new(TransactionLedger::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let engine = Arc::new(WalletEngine::new(
            store,
            ledger,
            directory as Arc<dyn UserDirectory>,
            LimitPolicy::new(WalletLimits::default()),
            RetryPolicy::without_backoff(),
        ));
        let processor = BatchProcessor::new(engine);

        let batch: Vec<OperationRecord> = (0..6)
            .map(|i| OperationRecord {
                op: crate::types::OperationType::Load,
                owner: i % 2,
                recipient: None,
                amount: rust_decimal::Decimal::new(10 + i as i64, 0),
                key: format!("txn-{}", i),
            })
            .collect();

        let partitions = processor.partition_by_owner(batch);

        assert_eq!(partitions.len(), 2);
        let keys: Vec<&str> = partitions[&0].iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["txn-0", "txn-2", "txn-4"]);
        let keys: Vec<&str> = partitions[&1].iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["txn-1", "txn-3", "txn-5"]);
    }
}
