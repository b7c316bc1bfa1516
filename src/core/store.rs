//! Versioned wallet storage with compare-and-swap commits
//!
//! This module provides the `WalletStore` struct, the single
//! serialization point for wallet writes. Reads hand out snapshot clones
//! carrying the stored version; writes succeed only if the stored
//! version still matches the snapshot's, otherwise they fail with
//! `VersionConflict` and write nothing.
//!
//! # Design
//!
//! Wallets live in a `DashMap` keyed by owner. Readers never block:
//! `get_or_create` and `get` clone the entry and release it immediately.
//! All commits pass through one short `parking_lot::Mutex` critical
//! section that checks versions and applies writes; this is what makes
//! the two-wallet commit used by transfers all-or-nothing, and it
//! guarantees that among concurrent writers to one wallet exactly one
//! write per version number succeeds.
//!
//! # Thread Safety
//!
//! All methods take `&self` and are safe to call from any number of
//! threads. A stale snapshot can always be read; it is rejected at
//! commit time, never silently overwritten.

use crate::types::{OwnerId, Wallet, WalletError};
use chrono::NaiveDate;
use dashmap::DashMap;
use parking_lot::Mutex;

/// Versioned wallet store with compare-and-swap commit semantics
#[derive(Debug, Default)]
pub struct WalletStore {
    /// Wallet records keyed by owner
    wallets: DashMap<OwnerId, Wallet>,

    /// Serializes version-check-then-apply across all commits
    ///
    /// Held only for the duration of a commit; reads bypass it.
    commits: Mutex<()>,
}

impl WalletStore {
    /// Create a new empty WalletStore
    pub fn new() -> Self {
        Self {
            wallets: DashMap::new(),
            commits: Mutex::new(()),
        }
    }

    /// Get a snapshot of an owner's wallet, creating it on first access
    ///
    /// A missing wallet is created with zero balances, unfrozen, at
    /// version 0, with `today` as its reset date. Racing first accesses
    /// resolve to a single stored record; every caller sees the same
    /// wallet. The returned value is a clone: concurrent writes are not
    /// reflected in it, and it must be passed back to [`commit`] with
    /// its version intact to take effect.
    ///
    /// [`commit`]: WalletStore::commit
    pub fn get_or_create(&self, owner: OwnerId, today: NaiveDate) -> Wallet {
        self.wallets
            .entry(owner)
            .or_insert_with(|| Wallet::new(owner, today))
            .clone()
    }

    /// Get a snapshot of an owner's wallet without creating one
    pub fn get(&self, owner: OwnerId) -> Option<Wallet> {
        self.wallets.get(&owner).map(|entry| entry.clone())
    }

    /// Persist a mutated wallet if its version is still current
    ///
    /// On success the stored version is incremented and the updated
    /// wallet (with its new version) is returned. On a version mismatch
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` if the stored version differs from
    /// `wallet.version`, or if the wallet was never created.
    pub fn commit(&self, wallet: &Wallet) -> Result<Wallet, WalletError> {
        let _guard = self.commits.lock();
        self.apply(wallet)
    }

    /// Persist two mutated wallets atomically
    ///
    /// Both versions are checked before either write is applied: the
    /// pair commits together or not at all. This is the unit of work
    /// behind a transfer, where a debit must never become durable
    /// without its matching credit. The owners must differ; the same
    /// wallet cannot satisfy two version checks in one call.
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` for the first wallet whose stored
    /// version has moved; neither wallet is written in that case.
    pub fn commit_pair(
        &self,
        first: &Wallet,
        second: &Wallet,
    ) -> Result<(Wallet, Wallet), WalletError> {
        let _guard = self.commits.lock();

        self.check_current(first)?;
        self.check_current(second)?;

        Ok((self.apply(first)?, self.apply(second)?))
    }

    /// Verify a wallet's version against the stored record
    ///
    /// Caller holds the commit lock.
    fn check_current(&self, wallet: &Wallet) -> Result<(), WalletError> {
        let stored = self
            .wallets
            .get(&wallet.owner)
            .map(|entry| entry.version)
            .ok_or_else(|| WalletError::version_conflict(wallet.owner, wallet.version, 0))?;
        if stored != wallet.version {
            return Err(WalletError::version_conflict(
                wallet.owner,
                wallet.version,
                stored,
            ));
        }
        Ok(())
    }

    /// Check-and-write a single wallet; caller holds the commit lock
    fn apply(&self, wallet: &Wallet) -> Result<Wallet, WalletError> {
        let mut entry = self
            .wallets
            .get_mut(&wallet.owner)
            .ok_or_else(|| WalletError::version_conflict(wallet.owner, wallet.version, 0))?;

        if entry.version != wallet.version {
            return Err(WalletError::version_conflict(
                wallet.owner,
                wallet.version,
                entry.version,
            ));
        }

        let mut updated = wallet.clone();
        updated.version += 1;
        *entry = updated.clone();
        Ok(updated)
    }

    /// Snapshot of all wallets, in arbitrary order
    pub fn all_wallets(&self) -> Vec<Wallet> {
        self.wallets
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of wallets created so far
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// Whether no wallet has been created yet
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}
