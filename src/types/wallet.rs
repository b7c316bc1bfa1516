//! Wallet types for the wallet engine
//!
//! This module defines the versioned wallet record that all balance
//! mutations operate on, together with the owner identifier type.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Owner identifier
///
/// Identifies the user a wallet belongs to. One wallet exists per owner.
pub type OwnerId = u64;

/// Per-user wallet record
///
/// Represents the current monetary state of one user. A wallet is created
/// lazily on first access with zero balances and is never deleted. All
/// mutations go through the store's compare-and-swap write path, which
/// checks `version` against the stored record before applying anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Wallet {
    /// The owning user's ID (unique per wallet)
    pub owner: OwnerId,

    /// Current balance
    ///
    /// Conceptually non-negative; only checked before debiting, so credit
    /// paths never reject on balance.
    pub balance: Decimal,

    /// Cumulative amount loaded or sent out since `last_reset_date`
    pub daily_spent: Decimal,

    /// Whether outgoing transfers are blocked
    ///
    /// Set when `daily_spent` reaches the daily limit; cleared by the
    /// daily reset. Loads are not blocked by this flag.
    pub frozen: bool,

    /// Calendar date of the last daily-counter reset
    pub last_reset_date: NaiveDate,

    /// Optimistic-concurrency version
    ///
    /// Incremented by the store on every successful write. A write whose
    /// attached version no longer matches the stored one is rejected.
    pub version: u64,
}

impl Wallet {
    /// Create a new zero-balance wallet for the given owner
    ///
    /// The wallet starts with balance 0, nothing spent today, unfrozen,
    /// at version 0, with `today` as its reset date.
    pub fn new(owner: OwnerId, today: NaiveDate) -> Self {
        Wallet {
            owner,
            balance: Decimal::ZERO,
            daily_spent: Decimal::ZERO,
            frozen: false,
            last_reset_date: today,
            version: 0,
        }
    }
}
