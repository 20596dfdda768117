//! Domain module
//!
//! Core domain types shared across the service.

pub mod account;
pub mod amount;
pub mod transaction;

pub use account::Account;
pub use amount::{Amount, AmountError, Balance};
pub use transaction::{Direction, TransactionRecord, TransactionRow};
