//! Account store
//!
//! Thin wrapper over the `accounts` table. Balance mutation is not exposed
//! here; only the transfer engine writes balances, inside its atomic
//! section.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::Account;

#[derive(Debug, Clone)]
pub struct AccountStore {
    pool: PgPool,
}

impl AccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch an account by id.
    pub async fn get(&self, account_id: Uuid) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, user_id, name, balance, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Create an account for `user_id` with the given opening balance.
    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        initial_balance: Decimal,
    ) -> Result<Account, sqlx::Error> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO accounts (id, user_id, name, balance, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(initial_balance)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::info!(account_id = %id, user_id, "account created");

        Ok(Account {
            id,
            user_id: user_id.to_string(),
            name: name.to_string(),
            balance: initial_balance,
            created_at: now,
        })
    }

    /// List all accounts, oldest first.
    pub async fn list(&self) -> Result<Vec<Account>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, user_id, name, balance, created_at
            FROM accounts
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// A user's primary account: the first match under an explicit
    /// earliest-created order, not whatever the store happens to return
    /// first.
    pub async fn find_by_owner(&self, user_id: &str) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, user_id, name, balance, created_at
            FROM accounts
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}
