//! Error types for the wallet engine
//!
//! This module defines all error conditions the engine can surface.
//! Variants carry enough context for the caller to act on a rejection:
//! limit errors report what remains of today's allowance, balance errors
//! report the balance that was read.
//!
//! # Error Categories
//!
//! - **Validation errors**: invalid amount, daily limit, frozen wallet,
//!   insufficient balance, unknown recipient, self-transfer. Never
//!   retried; no partial state is left behind.
//! - **Idempotency errors**: duplicate transaction key.
//! - **Concurrency errors**: `VersionConflict` is internal and recovered
//!   by the retry loop; `RetriesExhausted` is surfaced once the retry
//!   budget is spent and is safe for the caller to retry.
//! - **Arithmetic errors**: overflow in balance calculations.

use crate::types::OwnerId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the wallet engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    /// Amount is non-positive or outside the configured range
    #[error("{operation} amount {amount} must be between {min} and {max}")]
    InvalidAmount {
        /// Operation that was attempted ("Load" or "Transfer")
        operation: String,
        /// The rejected amount
        amount: Decimal,
        /// Configured minimum per-operation amount
        min: Decimal,
        /// Configured maximum per-operation amount
        max: Decimal,
    },

    /// The idempotency key has already been recorded
    ///
    /// The operation this key belongs to already completed; resubmitting
    /// it must not move any balance again.
    #[error("Duplicate transaction '{key}', already processed")]
    DuplicateTransaction {
        /// The idempotency key that was replayed
        key: String,
    },

    /// The amount does not fit in today's remaining allowance
    #[error("Daily limit exceeded for owner {owner}: requested {requested}, remaining {remaining}")]
    DailyLimitExceeded {
        /// Owner whose limit was hit
        owner: OwnerId,
        /// The rejected amount
        requested: Decimal,
        /// Allowance left today (daily limit minus spent)
        remaining: Decimal,
    },

    /// The wallet is frozen and cannot send transfers
    #[error("Wallet of owner {owner} is frozen until the daily reset")]
    WalletFrozen {
        /// Owner of the frozen wallet
        owner: OwnerId,
    },

    /// The wallet does not hold enough to cover the debit
    #[error("Insufficient balance for owner {owner}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// Owner whose balance was read
        owner: OwnerId,
        /// Balance at the time of the check
        balance: Decimal,
        /// The rejected amount
        requested: Decimal,
    },

    /// The transfer recipient is not a known user
    #[error("Recipient {recipient} not found")]
    RecipientNotFound {
        /// The unknown recipient ID
        recipient: OwnerId,
    },

    /// Sender and recipient of a transfer are the same owner
    #[error("Owner {owner} cannot transfer to their own wallet")]
    SelfTransfer {
        /// The owner on both sides of the transfer
        owner: OwnerId,
    },

    /// The wallet's stored version moved between read and write
    ///
    /// Internal to the engine: the retry loop recovers from this by
    /// re-reading and re-running the attempt. Only surfaces to callers
    /// wrapped inside [`WalletError::RetriesExhausted`].
    #[error("Version conflict on wallet of owner {owner}: expected {expected}, found {found}")]
    VersionConflict {
        /// Owner of the contended wallet
        owner: OwnerId,
        /// Version attached to the write
        expected: u64,
        /// Version actually stored
        found: u64,
    },

    /// The retry budget was spent without a conflict-free attempt
    ///
    /// Wraps the last conflict. The operation had no durable effect and
    /// may be resubmitted by the caller.
    #[error("{operation} failed after {attempts} attempts")]
    RetriesExhausted {
        /// Operation that gave up ("load" or "transfer")
        operation: String,
        /// Number of attempts made
        attempts: u32,
        /// The conflict observed on the final attempt
        #[source]
        source: Box<WalletError>,
    },

    /// A balance calculation would overflow
    #[error("Arithmetic overflow in {operation} for owner {owner}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Owner whose wallet was being mutated
        owner: OwnerId,
    },
}

impl WalletError {
    /// Whether the retry loop may recover from this error
    ///
    /// Only version conflicts are transient; everything else aborts the
    /// operation immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WalletError::VersionConflict { .. })
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(operation: &str, amount: Decimal, min: Decimal, max: Decimal) -> Self {
        WalletError::InvalidAmount {
            operation: operation.to_string(),
            amount,
            min,
            max,
        }
    }

    /// Create a DuplicateTransaction error
    pub fn duplicate_transaction(key: &str) -> Self {
        WalletError::DuplicateTransaction {
            key: key.to_string(),
        }
    }

    /// Create a DailyLimitExceeded error
    pub fn daily_limit_exceeded(owner: OwnerId, requested: Decimal, remaining: Decimal) -> Self {
        WalletError::DailyLimitExceeded {
            owner,
            requested,
            remaining,
        }
    }

    /// Create a WalletFrozen error
    pub fn wallet_frozen(owner: OwnerId) -> Self {
        WalletError::WalletFrozen { owner }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(owner: OwnerId, balance: Decimal, requested: Decimal) -> Self {
        WalletError::InsufficientBalance {
            owner,
            balance,
            requested,
        }
    }

    /// Create a RecipientNotFound error
    pub fn recipient_not_found(recipient: OwnerId) -> Self {
        WalletError::RecipientNotFound { recipient }
    }

    /// Create a SelfTransfer error
    pub fn self_transfer(owner: OwnerId) -> Self {
        WalletError::SelfTransfer { owner }
    }

    /// Create a VersionConflict error
    pub fn version_conflict(owner: OwnerId, expected: u64, found: u64) -> Self {
        WalletError::VersionConflict {
            owner,
            expected,
            found,
        }
    }

    /// Create a RetriesExhausted error wrapping the final conflict
    pub fn retries_exhausted(operation: &str, attempts: u32, source: WalletError) -> Self {
        WalletError::RetriesExhausted {
            operation: operation.to_string(),
            attempts,
            source: Box::new(source),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, owner: OwnerId) -> Self {
        WalletError::ArithmeticOverflow {
            operation: operation.to_string(),
            owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::invalid_amount(
        WalletError::invalid_amount("Load", Decimal::new(-5, 0), Decimal::ONE, Decimal::new(10_000, 0)),
        "Load amount -5 must be between 1 and 10000"
    )]
    #[case::duplicate(
        WalletError::duplicate_transaction("txn-42"),
        "Duplicate transaction 'txn-42', already processed"
    )]
    #[case::daily_limit(
        WalletError::daily_limit_exceeded(3, Decimal::new(60, 0), Decimal::new(50, 0)),
        "Daily limit exceeded for owner 3: requested 60, remaining 50"
    )]
    #[case::frozen(
        WalletError::wallet_frozen(9),
        "Wallet of owner 9 is frozen until the daily reset"
    )]
    #[case::insufficient(
        WalletError::insufficient_balance(1, Decimal::new(20, 0), Decimal::new(75, 0)),
        "Insufficient balance for owner 1: balance 20, requested 75"
    )]
    #[case::recipient(
        WalletError::recipient_not_found(404),
        "Recipient 404 not found"
    )]
    #[case::self_transfer(
        WalletError::self_transfer(5),
        "Owner 5 cannot transfer to their own wallet"
    )]
    #[case::conflict(
        WalletError::version_conflict(2, 4, 5),
        "Version conflict on wallet of owner 2: expected 4, found 5"
    )]
    #[case::overflow(
        WalletError::arithmetic_overflow("load", 1),
        "Arithmetic overflow in load for owner 1"
    )]
    fn test_error_display(#[case] error: WalletError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_retries_exhausted_wraps_conflict() {
        let conflict = WalletError::version_conflict(1, 3, 4);
        let error = WalletError::retries_exhausted("load", 3, conflict.clone());

        assert_eq!(error.to_string(), "load failed after 3 attempts");
        match error {
            WalletError::RetriesExhausted { source, .. } => assert_eq!(*source, conflict),
            other => panic!("Expected RetriesExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_only_version_conflict_is_retryable() {
        assert!(WalletError::version_conflict(1, 1, 2).is_retryable());
        assert!(!WalletError::wallet_frozen(1).is_retryable());
        assert!(!WalletError::duplicate_transaction("k").is_retryable());
        assert!(!WalletError::retries_exhausted(
            "load",
            3,
            WalletError::version_conflict(1, 1, 2)
        )
        .is_retryable());
    }
}
