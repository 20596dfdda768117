//! Transfer handler
//!
//! The transactional core of the service. A transfer debits the source
//! account, credits the destination, and appends the paired `sent` /
//! `received` log records, all inside one serializable transaction. Either
//! all four writes commit or none of them do.

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Amount, Balance, Direction};
use crate::error::AppError;

use super::{TransferCommand, TransferError, TransferOutcome};

/// Bounded, transparent retries for lost serialization races.
const MAX_RETRIES: u32 = 3;

/// Handler for account-to-account transfers
#[derive(Debug, Clone)]
pub struct TransferHandler {
    pool: PgPool,
}

impl TransferHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute the transfer command on behalf of `requester_user_id`.
    ///
    /// Validation that needs no storage happens up front; everything that
    /// reads or writes account state runs inside the atomic section.
    pub async fn execute(
        &self,
        requester_user_id: &str,
        command: TransferCommand,
    ) -> Result<TransferOutcome, AppError> {
        let amount: Amount = command
            .amount
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("Invalid amount: {e}")))?;

        if command.source_account_id == command.dest_account_id {
            return Err(AppError::InvalidRequest(
                "Cannot transfer to the same account".to_string(),
            ));
        }

        let category = command.category.clone().unwrap_or_default();

        for attempt in 0..MAX_RETRIES {
            match self
                .try_execute(requester_user_id, &command, &amount, &category)
                .await
            {
                Ok(outcome) => {
                    tracing::info!(
                        sent_record = %outcome.sent_record_id,
                        received_record = %outcome.received_record_id,
                        amount = %outcome.amount,
                        "transfer committed"
                    );
                    return Ok(outcome);
                }
                Err(e) if e.is_retryable() && attempt < MAX_RETRIES - 1 => {
                    let delay = Duration::from_millis(50 * (attempt as u64 + 1));
                    tracing::warn!(
                        attempt = attempt + 1,
                        max = MAX_RETRIES,
                        "serialization conflict, retrying transfer"
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TransferError::MaxRetriesExceeded(MAX_RETRIES).into())
    }

    /// One attempt at the atomic section. A serialization failure leaves no
    /// partial effect; the caller decides whether to retry.
    async fn try_execute(
        &self,
        requester_user_id: &str,
        command: &TransferCommand,
        amount: &Amount,
        category: &str,
    ) -> Result<TransferOutcome, TransferError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        // Both accounts from the same snapshot
        let source = self
            .fetch_account(&mut tx, command.source_account_id)
            .await?
            .ok_or(TransferError::AccountNotFound)?;
        let dest = self
            .fetch_account(&mut tx, command.dest_account_id)
            .await?
            .ok_or(TransferError::AccountNotFound)?;

        // Ownership before balance, so a denied requester learns nothing
        // about the funds
        if source.user_id != requester_user_id {
            return Err(TransferError::PermissionDenied);
        }

        // Balances written out of band below zero count as empty
        let available = Balance::new(source.balance).unwrap_or_default();
        let Ok(new_source_balance) = available.debit(amount) else {
            return Err(TransferError::InsufficientFunds {
                required: amount.value(),
                available: available.value(),
            });
        };
        let new_dest_balance = dest.balance + amount.value();

        self.write_balance(&mut tx, command.source_account_id, new_source_balance.value())
            .await?;
        self.write_balance(&mut tx, command.dest_account_id, new_dest_balance)
            .await?;

        // Both halves of the pair share the same timestamp
        let now = Utc::now();
        let sent_record_id = Uuid::new_v4();
        let received_record_id = Uuid::new_v4();

        self.insert_record(
            &mut tx,
            sent_record_id,
            &source.user_id,
            command,
            amount,
            Direction::Sent,
            category,
            &dest.name,
            now,
        )
        .await?;
        self.insert_record(
            &mut tx,
            received_record_id,
            &dest.user_id,
            command,
            amount,
            Direction::Received,
            category,
            &source.name,
            now,
        )
        .await?;

        tx.commit().await?;

        Ok(TransferOutcome {
            sent_record_id,
            received_record_id,
            amount: amount.value(),
            date: now,
        })
    }

    async fn fetch_account(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        account_id: Uuid,
    ) -> Result<Option<AccountSnapshot>, TransferError> {
        let row: Option<(String, String, Decimal)> = sqlx::query_as(
            r#"
            SELECT user_id, name, COALESCE(balance, 0)
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(|(user_id, name, balance)| AccountSnapshot {
            user_id,
            name,
            balance,
        }))
    }

    async fn write_balance(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        account_id: Uuid,
        balance: Decimal,
    ) -> Result<(), TransferError> {
        sqlx::query("UPDATE accounts SET balance = $2 WHERE id = $1")
            .bind(account_id)
            .bind(balance)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_record(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        record_id: Uuid,
        owner_user_id: &str,
        command: &TransferCommand,
        amount: &Amount,
        direction: Direction,
        category: &str,
        counterparty: &str,
        date: chrono::DateTime<Utc>,
    ) -> Result<(), TransferError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, user_id, from_account_id, to_account_id,
                amount, direction, category, counterparty, date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            "#,
        )
        .bind(record_id)
        .bind(owner_user_id)
        .bind(command.source_account_id)
        .bind(command.dest_account_id)
        .bind(amount.value())
        .bind(direction.as_str())
        .bind(category)
        .bind(counterparty)
        .bind(date)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

/// Account state read inside the atomic section.
#[derive(Debug)]
struct AccountSnapshot {
    user_id: String,
    name: String,
    balance: Decimal,
}
