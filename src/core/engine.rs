//! Wallet mutation orchestration
//!
//! This module provides the `WalletEngine`, which composes the policy,
//! store, ledger and retry components into the two mutating operations
//! of the system: self-credit ("load") and peer-to-peer transfer.
//!
//! # Operation shape
//!
//! Every mutation follows the same sequence:
//!
//! 1. Idempotency check against the ledger, once, before any retry.
//! 2. Up to the retry budget: read fresh wallet snapshots, apply the
//!    daily reset, validate, mutate in memory, commit via
//!    compare-and-swap. A version conflict re-enters the sequence from
//!    the read; any validation failure aborts the whole operation.
//! 3. Append ledger rows after the commit succeeded, so a ledger row
//!    always implies a durable balance change.
//!
//! # Concurrency
//!
//! The engine holds no operation state and can be shared behind an
//! `Arc` across any number of threads or tasks. The store's
//! compare-and-swap write is the only serialization point.
//!
//! # Write hook
//!
//! Concurrency tests need both racing operations to read before either
//! writes. An optional hook fires between the in-memory mutation and
//! the commit of every attempt; tests install a barrier there instead
//! of relying on sleeps and timing.

use crate::core::directory::UserDirectory;
use crate::core::ledger::TransactionLedger;
use crate::core::policy::LimitPolicy;
use crate::core::retry::RetryPolicy;
use crate::core::store::WalletStore;
use crate::types::{LedgerEntry, LoadReceipt, OwnerId, TransferReceipt, Wallet, WalletError};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

/// Callback fired between a mutation attempt's read and its write
///
/// Receives the initiating owner's ID. Used by tests to hold attempts
/// at the point where the original design inserted artificial delays.
pub type WriteHook = Arc<dyn Fn(OwnerId) + Send + Sync>;

/// Orchestrator for wallet mutations
///
/// Owns its collaborators by explicit constructor wiring and exposes
/// the synchronous call contract of the system: `load_money`,
/// `transfer_money`, plus the read-only balance and history queries.
pub struct WalletEngine {
    store: Arc<WalletStore>,
    ledger: Arc<TransactionLedger>,
    directory: Arc<dyn UserDirectory>,
    policy: LimitPolicy,
    retry: RetryPolicy,
    write_hook: Option<WriteHook>,
}

impl WalletEngine {
    /// Create a new WalletEngine over the given collaborators
    pub fn new(
        store: Arc<WalletStore>,
        ledger: Arc<TransactionLedger>,
        directory: Arc<dyn UserDirectory>,
        policy: LimitPolicy,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            ledger,
            directory,
            policy,
            retry,
            write_hook: None,
        }
    }

    /// Install a hook invoked between each attempt's read and write
    pub fn with_write_hook(mut self, hook: WriteHook) -> Self {
        self.write_hook = Some(hook);
        self
    }

    /// Load money into an owner's wallet
    ///
    /// Creates the wallet on first use. The amount must be inside the
    /// configured range and fit into today's remaining allowance; a
    /// frozen wallet may still be loaded. Reaching the daily limit
    /// through this load freezes the wallet for outgoing transfers.
    ///
    /// # Errors
    ///
    /// * `DuplicateTransaction` if `key` was already recorded
    /// * `InvalidAmount` if the amount is out of range
    /// * `DailyLimitExceeded` if the amount exceeds today's allowance
    /// * `RetriesExhausted` if every attempt lost the version race
    pub fn load_money(
        &self,
        owner: OwnerId,
        amount: Decimal,
        key: &str,
    ) -> Result<LoadReceipt, WalletError> {
        if self.ledger.is_duplicate(key) {
            return Err(WalletError::duplicate_transaction(key));
        }

        let committed = self
            .retry
            .run("load", |attempt| self.attempt_load(owner, amount, attempt))?;

        self.ledger.record_load(owner, amount, key)?;

        info!(
            owner,
            %amount,
            key,
            balance = %committed.balance,
            version = committed.version,
            "load committed"
        );

        Ok(self.receipt_for(&committed))
    }

    /// Transfer money from one owner's wallet to another's
    ///
    /// The sender must be unfrozen with sufficient balance; the
    /// recipient must be a known user and different from the sender.
    /// The transferred amount accrues against the sender's daily spend
    /// and can freeze the sender's wallet, but transfers are not gated
    /// on the remaining daily allowance. Both wallet writes commit
    /// atomically; the debit and credit ledger rows are appended after.
    ///
    /// # Errors
    ///
    /// * `DuplicateTransaction` if `key` was already recorded
    /// * `InvalidAmount`, `WalletFrozen`, `InsufficientBalance`,
    ///   `RecipientNotFound`, `SelfTransfer` from validation
    /// * `RetriesExhausted` if every attempt lost the version race
    pub fn transfer_money(
        &self,
        sender: OwnerId,
        recipient: OwnerId,
        amount: Decimal,
        key: &str,
    ) -> Result<TransferReceipt, WalletError> {
        if self.ledger.is_duplicate(key) {
            return Err(WalletError::duplicate_transaction(key));
        }

        let committed_sender = self.retry.run("transfer", |attempt| {
            self.attempt_transfer(sender, recipient, amount, attempt)
        })?;

        self.ledger.record_transfer(sender, recipient, amount, key)?;

        info!(
            sender,
            recipient,
            %amount,
            key,
            sender_balance = %committed_sender.balance,
            "transfer committed"
        );

        Ok(TransferReceipt {
            amount_transferred: amount,
            sender_balance: committed_sender.balance,
            remaining_daily_limit: self.policy.remaining_daily_limit(&committed_sender),
            frozen: committed_sender.frozen,
        })
    }

    /// Read an owner's wallet state without mutating anything
    ///
    /// Creates the wallet on first access. The stored counters are
    /// reported as-is; the daily reset is applied by the next mutation,
    /// not by this read.
    pub fn balance_of(&self, owner: OwnerId) -> LoadReceipt {
        let wallet = self.store.get_or_create(owner, Self::today());
        self.receipt_for(&wallet)
    }

    /// Page through an owner's ledger rows, oldest first
    ///
    /// `page` is zero-based; a `page_size` of zero yields nothing.
    pub fn transactions_for(
        &self,
        owner: OwnerId,
        page: usize,
        page_size: usize,
    ) -> Vec<LedgerEntry> {
        self.ledger
            .entries_for(owner)
            .into_iter()
            .skip(page.saturating_mul(page_size))
            .take(page_size)
            .collect()
    }

    /// One load attempt: read, reset, validate, mutate, commit
    fn attempt_load(
        &self,
        owner: OwnerId,
        amount: Decimal,
        attempt: u32,
    ) -> Result<Wallet, WalletError> {
        self.policy.validate_amount(amount, "Load")?;

        let today = Self::today();
        let mut wallet = self.store.get_or_create(owner, today);
        self.policy.reset_if_new_day(&mut wallet, today);
        self.policy.validate_daily_limit(&wallet, amount)?;

        debug!(
            owner,
            attempt,
            balance = %wallet.balance,
            version = wallet.version,
            "read wallet for load"
        );

        wallet.balance = wallet
            .balance
            .checked_add(amount)
            .ok_or_else(|| WalletError::arithmetic_overflow("load", owner))?;
        self.policy.record_spend(&mut wallet, amount)?;

        self.fire_write_hook(owner);
        self.store.commit(&wallet)
    }

    /// One transfer attempt over fresh snapshots of both wallets
    ///
    /// Returns the committed sender wallet for the receipt.
    fn attempt_transfer(
        &self,
        sender: OwnerId,
        recipient: OwnerId,
        amount: Decimal,
        attempt: u32,
    ) -> Result<Wallet, WalletError> {
        self.policy.validate_amount(amount, "Transfer")?;
        if sender == recipient {
            return Err(WalletError::self_transfer(sender));
        }

        let today = Self::today();
        let mut sender_wallet = self.store.get_or_create(sender, today);
        self.policy.reset_if_new_day(&mut sender_wallet, today);
        self.policy.validate_frozen(&sender_wallet)?;
        self.policy.validate_balance(&sender_wallet, amount)?;

        if !self.directory.exists(recipient) {
            return Err(WalletError::recipient_not_found(recipient));
        }

        let mut recipient_wallet = self.store.get_or_create(recipient, today);
        self.policy.reset_if_new_day(&mut recipient_wallet, today);

        debug!(
            sender,
            recipient,
            attempt,
            sender_balance = %sender_wallet.balance,
            sender_version = sender_wallet.version,
            recipient_version = recipient_wallet.version,
            "read wallets for transfer"
        );

        // Balance already validated above, the debit cannot go negative
        sender_wallet.balance -= amount;
        self.policy.record_spend(&mut sender_wallet, amount)?;

        recipient_wallet.balance = recipient_wallet
            .balance
            .checked_add(amount)
            .ok_or_else(|| WalletError::arithmetic_overflow("transfer", recipient))?;

        self.fire_write_hook(sender);
        let (committed_sender, _) = self.store.commit_pair(&sender_wallet, &recipient_wallet)?;
        Ok(committed_sender)
    }

    fn receipt_for(&self, wallet: &Wallet) -> LoadReceipt {
        LoadReceipt {
            balance: wallet.balance,
            daily_spent: wallet.daily_spent,
            remaining_daily_limit: self.policy.remaining_daily_limit(wallet),
            frozen: wallet.frozen,
        }
    }

    fn fire_write_hook(&self, owner: OwnerId) {
        if let Some(hook) = &self.write_hook {
            hook(owner);
        }
    }

    /// Calendar date used for the daily reset boundary
    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}
