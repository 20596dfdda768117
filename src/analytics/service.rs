//! Analytics service
//!
//! Full-scan aggregation of a user's transaction log. Read-only and
//! best-effort: a failed balance lookup degrades to 0 instead of failing
//! the whole report.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::domain::{TransactionRecord, TransactionRow};
use crate::store::AccountStore;

use super::report::{build_report, AnalyticsReport};

#[derive(Debug, Clone)]
pub struct AnalyticsService {
    pool: PgPool,
    accounts: AccountStore,
}

impl AnalyticsService {
    pub fn new(pool: PgPool) -> Self {
        let accounts = AccountStore::new(pool.clone());
        Self { pool, accounts }
    }

    /// Summarize `user_id`'s complete history. No pagination; the whole
    /// owned log is scanned.
    pub async fn summarize(&self, user_id: &str) -> Result<AnalyticsReport, sqlx::Error> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, from_account_id, to_account_id, amount, direction,
                   category, counterparty, attachment, date, created_at
            FROM transactions
            WHERE user_id = $1
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let records = rows
            .into_iter()
            .map(|row| TransactionRecord::try_from(row).map_err(|e| sqlx::Error::Decode(e.into())))
            .collect::<Result<Vec<_>, _>>()?;

        let current_balance = self.current_balance(user_id).await;

        Ok(build_report(&records, current_balance))
    }

    /// The requester's primary-account balance. Analytics is reporting, not
    /// a source of truth, so lookup failures are logged and reported as 0.
    async fn current_balance(&self, user_id: &str) -> Decimal {
        match self.accounts.find_by_owner(user_id).await {
            Ok(Some(account)) => account.balance,
            Ok(None) => Decimal::ZERO,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "balance lookup failed, reporting 0");
                Decimal::ZERO
            }
        }
    }
}
