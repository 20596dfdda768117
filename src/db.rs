//! Database module
//!
//! Schema bootstrap and connectivity checks. The service owns its two
//! tables, so the schema is applied idempotently at startup.

use sqlx::PgPool;

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Create the tables and indexes if they do not exist yet.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id UUID PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            balance NUMERIC(20, 2) NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_accounts_owner
        ON accounts (user_id, created_at, id)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id UUID PRIMARY KEY,
            user_id TEXT NOT NULL,
            from_account_id UUID NOT NULL,
            to_account_id UUID NOT NULL,
            amount NUMERIC(20, 2) NOT NULL,
            direction TEXT NOT NULL CHECK (direction IN ('sent', 'received')),
            category TEXT NOT NULL DEFAULT '',
            counterparty TEXT NOT NULL DEFAULT '',
            attachment TEXT,
            date TIMESTAMPTZ NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Covers the owner-scoped, date-descending listing and the cursor seek
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_transactions_owner_date
        ON transactions (user_id, date DESC, id DESC)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema verified");
    Ok(())
}

/// Check that the required tables exist (used by health tooling).
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in ["accounts", "transactions"] {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}
