//! Limit and freeze policy
//!
//! This module provides the `LimitPolicy` struct, the pure decision
//! logic gating every balance mutation: amount bounds, the daily
//! spending allowance, the freeze flag and the balance check, plus the
//! daily rollover that clears the counters.
//!
//! # Design
//!
//! The policy performs no I/O and holds no mutable state. Date-dependent
//! checks take `today` as an argument so the same inputs always produce
//! the same outcome; the caller decides what "today" is and persists any
//! wallet it asked the policy to mutate.

use crate::config::WalletLimits;
use crate::types::{Wallet, WalletError};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Pure validation and freeze-transition logic for wallet mutations
///
/// Holds the configured [`WalletLimits`] and exposes one method per
/// rule. Validation methods never mutate; the two mutating methods
/// (`reset_if_new_day`, `record_spend`) only touch the in-memory wallet
/// handed to them.
#[derive(Debug, Clone)]
pub struct LimitPolicy {
    limits: WalletLimits,
}

impl LimitPolicy {
    /// Create a new LimitPolicy over the given limits
    pub fn new(limits: WalletLimits) -> Self {
        Self { limits }
    }

    /// The limits this policy enforces
    pub fn limits(&self) -> &WalletLimits {
        &self.limits
    }

    /// Check that an amount is positive and inside the configured range
    ///
    /// `operation` names the caller ("Load" or "Transfer") for the error
    /// message.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if `amount <= 0` or outside
    /// `[min_amount, max_amount]`.
    pub fn validate_amount(&self, amount: Decimal, operation: &str) -> Result<(), WalletError> {
        if amount <= Decimal::ZERO
            || amount < self.limits.min_amount
            || amount > self.limits.max_amount
        {
            return Err(WalletError::invalid_amount(
                operation,
                amount,
                self.limits.min_amount,
                self.limits.max_amount,
            ));
        }
        Ok(())
    }

    /// Clear the daily counters if the wallet's reset date is not today
    ///
    /// Sets `daily_spent` to zero, unfreezes the wallet and stamps
    /// `today` as the new reset date. Applied before any limit check on
    /// every mutation attempt; a wallet last touched today is left
    /// untouched. The caller persists the change as part of its write.
    pub fn reset_if_new_day(&self, wallet: &mut Wallet, today: NaiveDate) {
        if wallet.last_reset_date != today {
            wallet.daily_spent = Decimal::ZERO;
            wallet.frozen = false;
            wallet.last_reset_date = today;
        }
    }

    /// Check that an amount fits in today's remaining allowance
    ///
    /// # Errors
    ///
    /// Returns `DailyLimitExceeded` (carrying the remaining allowance)
    /// if `amount > daily_limit - daily_spent`.
    pub fn validate_daily_limit(&self, wallet: &Wallet, amount: Decimal) -> Result<(), WalletError> {
        let remaining = self.remaining_daily_limit(wallet);
        if amount > remaining {
            return Err(WalletError::daily_limit_exceeded(
                wallet.owner,
                amount,
                remaining,
            ));
        }
        Ok(())
    }

    /// Check that the wallet is not frozen
    ///
    /// Applied on the transfer (debit) path only; loading a frozen
    /// wallet stays allowed.
    ///
    /// # Errors
    ///
    /// Returns `WalletFrozen` if the flag is set.
    pub fn validate_frozen(&self, wallet: &Wallet) -> Result<(), WalletError> {
        if wallet.frozen {
            return Err(WalletError::wallet_frozen(wallet.owner));
        }
        Ok(())
    }

    /// Check that the wallet balance covers a debit
    ///
    /// # Errors
    ///
    /// Returns `InsufficientBalance` (carrying the balance read) if
    /// `balance < amount`.
    pub fn validate_balance(&self, wallet: &Wallet, amount: Decimal) -> Result<(), WalletError> {
        if wallet.balance < amount {
            return Err(WalletError::insufficient_balance(
                wallet.owner,
                wallet.balance,
                amount,
            ));
        }
        Ok(())
    }

    /// Accrue an amount against today's allowance and freeze on the cap
    ///
    /// Adds `amount` to `daily_spent` with checked arithmetic and sets
    /// `frozen` once the accumulated spend reaches the daily limit. This
    /// is the only freeze transition besides the daily reset.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the accrual would overflow.
    pub fn record_spend(&self, wallet: &mut Wallet, amount: Decimal) -> Result<(), WalletError> {
        wallet.daily_spent = wallet
            .daily_spent
            .checked_add(amount)
            .ok_or_else(|| WalletError::arithmetic_overflow("record_spend", wallet.owner))?;

        if wallet.daily_spent >= self.limits.daily_limit {
            wallet.frozen = true;
        }

        Ok(())
    }

    /// Allowance left today: `daily_limit - daily_spent`
    ///
    /// Can go negative when transfers (which skip the limit check) push
    /// the spend past the cap; callers report the value as-is.
    pub fn remaining_daily_limit(&self, wallet: &Wallet) -> Decimal {
        self.limits.daily_limit - wallet.daily_spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn policy() -> LimitPolicy {
        // min 1, max 10_000, daily limit 1_000
        LimitPolicy::new(WalletLimits::default())
    }

    fn wallet_on(day: NaiveDate) -> Wallet {
        Wallet::new(1, day)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case::at_min(Decimal::ONE)]
    #[case::typical(Decimal::new(250, 0))]
    #[case::at_max(Decimal::new(10_000, 0))]
    fn test_validate_amount_accepts_in_range(#[case] amount: Decimal) {
        assert!(policy().validate_amount(amount, "Load").is_ok());
    }

    #[rstest]
    #[case::zero(Decimal::ZERO)]
    #[case::negative(Decimal::new(-10, 0))]
    #[case::below_min(Decimal::new(5, 1))]
    #[case::above_max(Decimal::new(10_001, 0))]
    fn test_validate_amount_rejects_out_of_range(#[case] amount: Decimal) {
        let result = policy().validate_amount(amount, "Load");
        assert!(matches!(
            result.unwrap_err(),
            WalletError::InvalidAmount { .. }
        ));
    }

    #[test]
    fn test_reset_is_noop_on_same_day() {
        let today = day(2024, 3, 15);
        let mut wallet = wallet_on(today);
        wallet.daily_spent = Decimal::new(400, 0);
        wallet.frozen = true;

        policy().reset_if_new_day(&mut wallet, today);

        assert_eq!(wallet.daily_spent, Decimal::new(400, 0));
        assert!(wallet.frozen);
        assert_eq!(wallet.last_reset_date, today);
    }

    #[test]
    fn test_reset_clears_counters_on_new_day() {
        let yesterday = day(2024, 3, 14);
        let today = day(2024, 3, 15);
        let mut wallet = wallet_on(yesterday);
        wallet.daily_spent = Decimal::new(1_000, 0);
        wallet.frozen = true;

        policy().reset_if_new_day(&mut wallet, today);

        assert_eq!(wallet.daily_spent, Decimal::ZERO);
        assert!(!wallet.frozen);
        assert_eq!(wallet.last_reset_date, today);
    }

    #[test]
    fn test_reset_applies_even_when_stored_date_is_in_the_future() {
        // A clock moving backwards still counts as "a different day"
        let stored = day(2024, 3, 16);
        let today = day(2024, 3, 15);
        let mut wallet = wallet_on(stored);
        wallet.daily_spent = Decimal::new(10, 0);

        policy().reset_if_new_day(&mut wallet, today);

        assert_eq!(wallet.daily_spent, Decimal::ZERO);
        assert_eq!(wallet.last_reset_date, today);
    }

    #[test]
    fn test_daily_limit_allows_exact_remaining() {
        let mut wallet = wallet_on(day(2024, 3, 15));
        wallet.daily_spent = Decimal::new(950, 0);

        assert!(policy()
            .validate_daily_limit(&wallet, Decimal::new(50, 0))
            .is_ok());
    }

    #[test]
    fn test_daily_limit_rejects_over_remaining() {
        let mut wallet = wallet_on(day(2024, 3, 15));
        wallet.daily_spent = Decimal::new(950, 0);

        let result = policy().validate_daily_limit(&wallet, Decimal::new(60, 0));
        match result.unwrap_err() {
            WalletError::DailyLimitExceeded {
                requested,
                remaining,
                ..
            } => {
                assert_eq!(requested, Decimal::new(60, 0));
                assert_eq!(remaining, Decimal::new(50, 0));
            }
            other => panic!("Expected DailyLimitExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_frozen() {
        let mut wallet = wallet_on(day(2024, 3, 15));
        assert!(policy().validate_frozen(&wallet).is_ok());

        wallet.frozen = true;
        assert!(matches!(
            policy().validate_frozen(&wallet).unwrap_err(),
            WalletError::WalletFrozen { owner: 1 }
        ));
    }

    #[test]
    fn test_validate_balance() {
        let mut wallet = wallet_on(day(2024, 3, 15));
        wallet.balance = Decimal::new(100, 0);

        assert!(policy()
            .validate_balance(&wallet, Decimal::new(100, 0))
            .is_ok());
        assert!(matches!(
            policy()
                .validate_balance(&wallet, Decimal::new(101, 0))
                .unwrap_err(),
            WalletError::InsufficientBalance { .. }
        ));
    }

    #[test]
    fn test_record_spend_below_limit_stays_unfrozen() {
        let mut wallet = wallet_on(day(2024, 3, 15));

        policy()
            .record_spend(&mut wallet, Decimal::new(999, 0))
            .unwrap();

        assert_eq!(wallet.daily_spent, Decimal::new(999, 0));
        assert!(!wallet.frozen);
    }

    #[rstest]
    #[case::exactly_at_limit(Decimal::new(600, 0))]
    #[case::past_limit(Decimal::new(700, 0))]
    fn test_record_spend_reaching_limit_freezes(#[case] amount: Decimal) {
        let mut wallet = wallet_on(day(2024, 3, 15));
        wallet.daily_spent = Decimal::new(400, 0);

        policy().record_spend(&mut wallet, amount).unwrap();

        assert!(wallet.frozen);
    }

    #[test]
    fn test_remaining_daily_limit_math() {
        let mut wallet = wallet_on(day(2024, 3, 15));
        wallet.daily_spent = Decimal::new(200, 0);

        assert_eq!(
            policy().remaining_daily_limit(&wallet),
            Decimal::new(800, 0)
        );
    }
}
