//! Transaction log records
//!
//! Every transfer appends exactly two records to the log: a `sent` record
//! owned by the source account's user and a `received` record owned by the
//! destination account's user. Amount, endpoints, owner and timestamps are
//! immutable once written; only auxiliary metadata (category) may change.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Which side of a transfer a record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Direction::Sent),
            "received" => Ok(Direction::Received),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// One immutable half of a transfer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Store-assigned id, one per side of the transfer
    pub id: Uuid,

    /// The user this side of the record belongs to
    pub user_id: String,

    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: Decimal,
    pub direction: Direction,

    /// Free-form spending category
    pub category: String,

    /// Display-name snapshot of the other side's account
    pub counterparty: String,

    /// Optional attachment reference (receipt upload, out of core)
    pub attachment: Option<String>,

    /// Logical date of the transfer; both halves carry the same value
    pub date: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

/// Raw row shape for the `transactions` table; `direction` arrives as text.
#[derive(Debug, sqlx::FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub user_id: String,
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: Decimal,
    pub direction: String,
    pub category: String,
    pub counterparty: String,
    pub attachment: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for TransactionRecord {
    type Error = String;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let direction = row.direction.parse()?;
        Ok(TransactionRecord {
            id: row.id,
            user_id: row.user_id,
            from_account_id: row.from_account_id,
            to_account_id: row.to_account_id,
            amount: row.amount,
            direction,
            category: row.category,
            counterparty: row.counterparty,
            attachment: row.attachment,
            date: row.date,
            created_at: row.created_at,
        })
    }
}
