//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `wallet`: the versioned wallet record and owner identifier
//! - `transaction`: ledger rows, operation records and identifiers
//! - `receipt`: results returned for successful operations
//! - `error`: error types for the wallet engine

pub mod error;
pub mod receipt;
pub mod transaction;
pub mod wallet;

pub use error::WalletError;
pub use receipt::{LoadReceipt, TransferReceipt};
pub use transaction::{EntryId, LedgerEntry, OperationRecord, OperationType, TransactionKind};
pub use wallet::{OwnerId, Wallet};
