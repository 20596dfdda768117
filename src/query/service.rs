//! Transaction query service
//!
//! Owner-scoped, cursor-paginated retrieval of the transaction log,
//! strictly descending by logical date. Owner scoping is part of the SQL
//! predicate, never a post-hoc filter.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{TransactionRecord, TransactionRow};

use super::filter::TransactionFilter;

/// One page of the transaction log.
#[derive(Debug)]
pub struct Page {
    pub records: Vec<TransactionRecord>,
    pub next_cursor: Option<Uuid>,
    /// True iff the page filled completely. A page that happens to end
    /// exactly at the last record reports a false positive; the next call
    /// returns an empty page.
    pub has_more: bool,
}

#[derive(Debug, Clone)]
pub struct TransactionQuery {
    pool: PgPool,
}

impl TransactionQuery {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List `user_id`'s records matching `filter`, resuming strictly after
    /// `cursor` when given. A cursor that no longer resolves restarts from
    /// the top rather than erroring.
    pub async fn list(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
        page_size: i64,
        cursor: Option<Uuid>,
    ) -> Result<Page, sqlx::Error> {
        let anchor = match cursor {
            Some(id) => self.resolve_cursor(user_id, id).await?,
            None => None,
        };

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, user_id, from_account_id, to_account_id, amount, direction, \
             category, counterparty, attachment, date, created_at \
             FROM transactions WHERE user_id = ",
        );
        qb.push_bind(user_id);

        if let Some(min) = filter.min_amount {
            qb.push(" AND amount >= ").push_bind(min);
        }
        if let Some(max) = filter.max_amount {
            qb.push(" AND amount <= ").push_bind(max);
        }
        if let Some(month) = &filter.month {
            let (start, end) = month.range();
            qb.push(" AND date >= ").push_bind(start);
            qb.push(" AND date < ").push_bind(end);
        }
        if let Some((date, id)) = anchor {
            // Row comparison matches the (date DESC, id DESC) sort order
            qb.push(" AND (date, id) < (");
            qb.push_bind(date);
            qb.push(", ");
            qb.push_bind(id);
            qb.push(")");
        }

        qb.push(" ORDER BY date DESC, id DESC LIMIT ");
        qb.push_bind(page_size);

        let rows: Vec<TransactionRow> = qb.build_query_as().fetch_all(&self.pool).await?;

        let records = rows
            .into_iter()
            .map(|row| TransactionRecord::try_from(row).map_err(|e| sqlx::Error::Decode(e.into())))
            .collect::<Result<Vec<_>, _>>()?;

        let has_more = records.len() as i64 == page_size;
        let next_cursor = records.last().map(|r| r.id);

        Ok(Page {
            records,
            next_cursor,
            has_more,
        })
    }

    /// Position of the cursor record in the sort order, if it still exists
    /// and belongs to the caller.
    async fn resolve_cursor(
        &self,
        user_id: &str,
        cursor: Uuid,
    ) -> Result<Option<(DateTime<Utc>, Uuid)>, sqlx::Error> {
        sqlx::query_as("SELECT date, id FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(cursor)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }
}
