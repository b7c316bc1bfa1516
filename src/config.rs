//! Wallet limit configuration
//!
//! The engine validates every mutation against a process-wide set of
//! limits: a per-operation amount range and a daily spending allowance.
//! Values come from CLI flags (or defaults) and are fixed for the life
//! of the process; per-user limit overrides are deliberately not modeled
//! here.

use rust_decimal::Decimal;

/// Amount and daily-limit configuration for the wallet engine
#[derive(Debug, Clone, PartialEq)]
pub struct WalletLimits {
    /// Smallest accepted per-operation amount
    pub min_amount: Decimal,

    /// Largest accepted per-operation amount
    pub max_amount: Decimal,

    /// Total amount an owner may load or send out per calendar day
    ///
    /// Reaching this value freezes the wallet for outgoing transfers
    /// until the next daily reset.
    pub daily_limit: Decimal,
}

impl Default for WalletLimits {
    fn default() -> Self {
        Self {
            min_amount: Decimal::ONE,
            max_amount: Decimal::new(10_000, 0),
            daily_limit: Decimal::new(1_000, 0),
        }
    }
}

impl WalletLimits {
    /// Create a new WalletLimits with custom values
    ///
    /// Nonsensical combinations (min above max, non-positive bounds) fall
    /// back to the defaults with a warning, mirroring how batch tuning
    /// parameters are sanitized.
    pub fn new(min_amount: Decimal, max_amount: Decimal, daily_limit: Decimal) -> Self {
        let default = Self::default();

        if min_amount <= Decimal::ZERO || max_amount < min_amount {
            eprintln!(
                "Warning: Invalid amount range [{}, {}], using defaults [{}, {}]",
                min_amount, max_amount, default.min_amount, default.max_amount
            );
            return Self {
                daily_limit: if daily_limit > Decimal::ZERO {
                    daily_limit
                } else {
                    default.daily_limit
                },
                ..default
            };
        }

        let daily_limit = if daily_limit <= Decimal::ZERO {
            eprintln!(
                "Warning: Invalid daily limit ({}), using default ({})",
                daily_limit, default.daily_limit
            );
            default.daily_limit
        } else {
            daily_limit
        };

        Self {
            min_amount,
            max_amount,
            daily_limit,
        }
    }
}
