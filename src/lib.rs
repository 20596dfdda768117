//! ledgerpay Library
//!
//! Re-exports modules for integration testing and external use.

pub mod analytics;
pub mod api;
pub mod domain;
pub mod handlers;
pub mod query;
pub mod store;

pub mod config;
pub mod db;
mod error;

pub use api::AppState;
pub use config::Config;
pub use domain::{Account, Amount, AmountError, Balance, Direction, TransactionRecord};
pub use error::{AppError, AppResult};
pub use handlers::{TransferCommand, TransferError, TransferHandler, TransferOutcome};
