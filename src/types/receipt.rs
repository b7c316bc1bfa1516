//! Result types returned to callers after successful operations
//!
//! Receipts carry the state a caller needs to plan its next move:
//! the new balance, how much of today's allowance is spent and left,
//! and whether the wallet ended up frozen.

use rust_decimal::Decimal;

/// Outcome of a successful load (also used for balance inquiries)
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReceipt {
    /// Balance after the operation
    pub balance: Decimal,

    /// Amount spent or loaded since the last daily reset
    pub daily_spent: Decimal,

    /// Allowance left today (daily limit minus spent)
    pub remaining_daily_limit: Decimal,

    /// Whether the wallet is frozen for outgoing transfers
    pub frozen: bool,
}

/// Outcome of a successful peer-to-peer transfer
///
/// Reports the sender's side only; the recipient learns about the credit
/// through their own transaction history.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    /// Amount moved to the recipient
    pub amount_transferred: Decimal,

    /// Sender's balance after the debit
    pub sender_balance: Decimal,

    /// Sender's allowance left today
    pub remaining_daily_limit: Decimal,

    /// Whether the sender's wallet ended up frozen
    pub frozen: bool,
}
