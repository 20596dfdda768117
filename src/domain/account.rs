//! Account entity
//!
//! A balance-bearing entity owned by exactly one user. The balance field is
//! mutated only by the transfer engine; everything else is plain data.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// A user's account as stored in the `accounts` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Store-assigned id
    pub id: Uuid,

    /// Owning user (identity-provider subject)
    pub user_id: String,

    /// Display name
    pub name: String,

    /// Current balance. Never goes negative through the transfer engine.
    pub balance: Decimal,

    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_serializes_camel_case() {
        let account = Account {
            id: Uuid::nil(),
            user_id: "subject-1".to_string(),
            name: "Main".to_string(),
            balance: dec!(12.50),
            created_at: DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["userId"], "subject-1");
        assert!(json["createdAt"].is_string());
    }
}
