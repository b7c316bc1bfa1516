//! Transaction types for the wallet engine
//!
//! This module defines the ledger row recorded for every completed
//! mutation, the operation records parsed from CSV input, and the
//! associated identifier types.

use crate::types::OwnerId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger entry identifier
///
/// Assigned sequentially by the ledger in append order.
pub type EntryId = u64;

/// Kind of a recorded transaction
///
/// A load produces one `SelfCredited` row. A transfer produces a
/// `Debit` row for the sender and a `Credit` row for the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Owner loaded money into their own wallet
    SelfCredited,

    /// Outgoing side of a peer-to-peer transfer
    Debit,

    /// Incoming side of a peer-to-peer transfer
    Credit,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionKind::SelfCredited => "SELF_CREDITED",
            TransactionKind::Debit => "DEBIT",
            TransactionKind::Credit => "CREDIT",
        };
        write!(f, "{}", name)
    }
}

/// Immutable ledger row for a completed mutation
///
/// Appended once per successful balance change and never updated or
/// deleted. The idempotency key is unique ledger-wide; the credit side
/// of a transfer derives its key from the debit side's key so the debit
/// key alone is sufficient to detect replays.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// Ledger-assigned row ID (append order)
    pub id: EntryId,

    /// The user this row belongs to
    pub owner: OwnerId,

    /// Positive magnitude of the mutation
    pub amount: Decimal,

    /// What the mutation was
    pub kind: TransactionKind,

    /// When the row was appended
    pub timestamp: DateTime<Utc>,

    /// Caller-supplied transaction identifier
    pub idempotency_key: String,
}

/// Kind of an operation submitted to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Self-credit: add money to the initiating owner's wallet
    Load,

    /// Peer-to-peer transfer from the initiating owner to a recipient
    Transfer,
}

/// One operation parsed from CSV input
///
/// `recipient` is only present for transfers. The idempotency key is the
/// caller's handle for replay detection; submitting the same key twice
/// must not change any balance a second time.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    /// The operation to perform
    pub op: OperationType,

    /// The initiating owner (load target, or transfer sender)
    pub owner: OwnerId,

    /// Transfer recipient; `None` for loads
    pub recipient: Option<OwnerId>,

    /// Amount to load or transfer
    pub amount: Decimal,

    /// Caller-supplied idempotency key
    pub key: String,
}
