//! Core business logic module
//!
//! This module contains the balance-mutation engine and its parts:
//! - `policy` - amount, limit, freeze and balance validation
//! - `store` - versioned wallet storage with compare-and-swap commits
//! - `ledger` - append-only transaction record with idempotency keys
//! - `retry` - bounded retry loop for version conflicts
//! - `directory` - recipient-existence collaborator
//! - `engine` - orchestration of loads and transfers

pub mod directory;
pub mod engine;
pub mod ledger;
pub mod policy;
pub mod retry;
pub mod store;

pub use directory::{InMemoryDirectory, UserDirectory};
pub use engine::{WalletEngine, WriteHook};
pub use ledger::TransactionLedger;
pub use policy::LimitPolicy;
pub use retry::RetryPolicy;
pub use store::WalletStore;
