//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use rust_decimal::Decimal;
use sqlx::PgPool;

pub use routes::create_router;

/// Shared state injected into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Opening balance for newly created accounts
    pub seed_balance: Decimal,
}

impl AppState {
    pub fn new(pool: PgPool, seed_balance: Decimal) -> Self {
        Self { pool, seed_balance }
    }
}
