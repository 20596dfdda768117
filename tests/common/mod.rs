//! Common test utilities

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Connect to the test database and make sure the schema exists.
///
/// Returns `None` when `DATABASE_URL` is not configured so the suite can
/// run (and trivially pass) without a database. Tests use unique user ids
/// instead of truncating, so they stay safe under parallel execution.
pub async fn setup_test_db() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    ledgerpay::db::init_schema(&pool)
        .await
        .expect("Failed to apply schema");

    Some(pool)
}

/// A fresh user id that cannot collide with other tests.
pub fn unique_user() -> String {
    format!("user-{}", Uuid::new_v4())
}

/// Insert an account with a fixed balance and return its id.
pub async fn seed_account(pool: &PgPool, user_id: &str, name: &str, balance: Decimal) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO accounts (id, user_id, name, balance, created_at)
        VALUES ($1, $2, $3, $4, NOW())
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .bind(balance)
    .execute(pool)
    .await
    .expect("Failed to seed account");

    id
}

/// Current balance of an account.
pub async fn account_balance(pool: &PgPool, account_id: Uuid) -> Decimal {
    sqlx::query_scalar("SELECT balance FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read balance")
}

/// Number of log records owned by a user.
pub async fn record_count(pool: &PgPool, user_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count records")
}

/// Insert a raw log record directly (for query/analytics fixtures).
pub async fn seed_record(
    pool: &PgPool,
    user_id: &str,
    direction: &str,
    amount: Decimal,
    date: DateTime<Utc>,
) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO transactions (
            id, user_id, from_account_id, to_account_id,
            amount, direction, category, counterparty, date, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, '', '', $7, $7)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(Uuid::new_v4())
    .bind(Uuid::new_v4())
    .bind(amount)
    .bind(direction)
    .bind(date)
    .execute(pool)
    .await
    .expect("Failed to seed record");

    id
}
