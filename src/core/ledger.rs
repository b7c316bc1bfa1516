//! Append-only transaction ledger with idempotency enforcement
//!
//! This module provides the `TransactionLedger` struct, the record of
//! every completed mutation. Rows are keyed by their idempotency key,
//! so the map key doubles as the uniqueness constraint: at most one
//! `SELF_CREDITED`/`DEBIT` row can ever exist for a given key.
//!
//! # Durability Contract
//!
//! The engine appends to the ledger only after the corresponding wallet
//! write has committed. A row's existence therefore implies the balance
//! change behind it is durable; the converse does not hold (a commit
//! whose append then loses an idempotency race reports the duplicate to
//! the caller).

use crate::types::{EntryId, LedgerEntry, OwnerId, TransactionKind, WalletError};
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};

/// Suffix appended to a transfer's key for the credit-side row
///
/// Keeps the two rows of one transfer related but distinguishable, so
/// the debit key alone is enough to detect a replay.
const CREDIT_KEY_SUFFIX: &str = "-CREDIT";

/// Append-only record of completed wallet mutations
///
/// Thread-safe; rows are never updated or deleted once appended.
#[derive(Debug)]
pub struct TransactionLedger {
    /// Ledger rows keyed by idempotency key
    entries: DashMap<String, LedgerEntry>,

    /// Next row ID, handed out in append order
    next_id: AtomicU64,
}

impl TransactionLedger {
    /// Create a new empty TransactionLedger
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Whether a transaction with this idempotency key was already recorded
    pub fn is_duplicate(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Record a completed load as one `SELF_CREDITED` row
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTransaction` if the key is already present; the
    /// existing row is left untouched.
    pub fn record_load(
        &self,
        owner: OwnerId,
        amount: Decimal,
        key: &str,
    ) -> Result<LedgerEntry, WalletError> {
        self.append(owner, amount, TransactionKind::SelfCredited, key)
    }

    /// Record a completed transfer as a `DEBIT` plus `CREDIT` row pair
    ///
    /// The debit row takes the caller's key; the credit row takes the
    /// derived `{key}-CREDIT` key.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTransaction` if either key is already present.
    pub fn record_transfer(
        &self,
        debtor: OwnerId,
        creditor: OwnerId,
        amount: Decimal,
        key: &str,
    ) -> Result<(LedgerEntry, LedgerEntry), WalletError> {
        let debit = self.append(debtor, amount, TransactionKind::Debit, key)?;
        let credit = self.append(
            creditor,
            amount,
            TransactionKind::Credit,
            &format!("{}{}", key, CREDIT_KEY_SUFFIX),
        )?;
        Ok((debit, credit))
    }

    /// Append one row, enforcing key uniqueness
    ///
    /// The entry closure only runs when the key slot is vacant, which
    /// makes the existence check and the insert one atomic step.
    fn append(
        &self,
        owner: OwnerId,
        amount: Decimal,
        kind: TransactionKind,
        key: &str,
    ) -> Result<LedgerEntry, WalletError> {
        let mut inserted = false;

        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| {
                inserted = true;
                LedgerEntry {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed),
                    owner,
                    amount,
                    kind,
                    timestamp: Utc::now(),
                    idempotency_key: key.to_string(),
                }
            })
            .clone();

        if inserted {
            Ok(entry)
        } else {
            Err(WalletError::duplicate_transaction(key))
        }
    }

    /// All rows belonging to an owner, oldest first
    pub fn entries_for(&self, owner: OwnerId) -> Vec<LedgerEntry> {
        let mut rows: Vec<LedgerEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.value().owner == owner)
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.id);
        rows
    }

    /// Total number of rows recorded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no row has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TransactionLedger {
    fn default() -> Self {
        Self::new()
    }
}
