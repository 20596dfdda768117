//! Command definitions
//!
//! Commands represent intentions to change the system state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Command to move funds between two accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCommand {
    /// Account to debit; must be owned by the requester
    pub source_account_id: Uuid,
    /// Account to credit
    pub dest_account_id: Uuid,
    /// Amount to transfer (as string for precise decimal)
    pub amount: String,
    /// Spending category for the log records
    pub category: Option<String>,
}

impl TransferCommand {
    pub fn new(source_account_id: Uuid, dest_account_id: Uuid, amount: String) -> Self {
        Self {
            source_account_id,
            dest_account_id,
            amount,
            category: None,
        }
    }

    pub fn with_category(mut self, category: String) -> Self {
        self.category = Some(category);
        self
    }
}

/// Result of a successful transfer: the two halves of the log pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub sent_record_id: Uuid,
    pub received_record_id: Uuid,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_command_builder() {
        let cmd = TransferCommand::new(Uuid::new_v4(), Uuid::new_v4(), "100.00".to_string())
            .with_category("groceries".to_string());

        assert_eq!(cmd.amount, "100.00");
        assert_eq!(cmd.category, Some("groceries".to_string()));
    }
}
