//! CSV format handling for operation input and wallet output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Wallet state output serialization
//!
//! All functions are pure (no I/O) for easy testing.
//!
//! # Input format
//!
//! ```text
//! op,owner,recipient,amount,key
//! load,1,,100.0,txn-001
//! transfer,1,2,25.0,txn-002
//! ```
//!
//! `recipient` is only meaningful for transfers; `key` is the caller's
//! idempotency key and must be unique per logical operation.

use crate::types::{OperationRecord, OperationType, OwnerId, Wallet};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: op, owner, recipient,
/// amount, key. Recipient is optional because load operations leave the
/// column empty.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub owner: OwnerId,
    pub recipient: Option<String>,
    pub amount: Option<String>,
    pub key: String,
}

/// Convert a CsvRecord to an OperationRecord
///
/// Parses the operation type, amount and optional recipient, and checks
/// the structural rules: every operation needs a positive-looking amount
/// and a non-empty key, transfers need a recipient, loads must not name
/// one. Range checks against the configured limits stay with the engine.
///
/// # Errors
///
/// Returns a message describing the first structural problem found.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<OperationRecord, String> {
    let op = match csv_record.op.to_lowercase().as_str() {
        "load" => OperationType::Load,
        "transfer" => OperationType::Transfer,
        other => {
            return Err(format!(
                "Invalid operation type '{}' for key '{}'",
                other, csv_record.key
            ))
        }
    };

    if csv_record.key.trim().is_empty() {
        return Err(format!(
            "Missing idempotency key for owner {}",
            csv_record.owner
        ));
    }

    let amount = match csv_record.amount.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Decimal::from_str(raw)
            .map_err(|_| format!("Invalid amount '{}' for key '{}'", raw, csv_record.key))?,
        _ => {
            return Err(format!(
                "Operation '{}' requires an amount",
                csv_record.key
            ))
        }
    };

    let recipient = match csv_record.recipient.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(
            raw.parse::<OwnerId>()
                .map_err(|_| format!("Invalid recipient '{}' for key '{}'", raw, csv_record.key))?,
        ),
        _ => None,
    };

    match (op, recipient) {
        (OperationType::Transfer, None) => Err(format!(
            "Transfer '{}' requires a recipient",
            csv_record.key
        )),
        (OperationType::Load, Some(_)) => Err(format!(
            "Load '{}' must not name a recipient",
            csv_record.key
        )),
        (op, recipient) => Ok(OperationRecord {
            op,
            owner: csv_record.owner,
            recipient,
            amount,
            key: csv_record.key.trim().to_string(),
        }),
    }
}

/// Write wallet states to CSV format
///
/// Writes wallets with columns: owner, balance, daily_spent, frozen,
/// version. Wallets are sorted by owner for deterministic output.
///
/// # Errors
///
/// Returns a message if a write error occurred.
pub fn write_wallets_csv(wallets: &[Wallet], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut sorted: Vec<&Wallet> = wallets.iter().collect();
    sorted.sort_by_key(|wallet| wallet.owner);

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["owner", "balance", "daily_spent", "frozen", "version"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for wallet in sorted {
        writer
            .write_record([
                wallet.owner.to_string(),
                wallet.balance.to_string(),
                wallet.daily_spent.to_string(),
                wallet.frozen.to_string(),
                wallet.version.to_string(),
            ])
            .map_err(|e| format!("Failed to write wallet record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush CSV output: {}", e))
}
