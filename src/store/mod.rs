//! Storage module
//!
//! Persistence wrappers over PostgreSQL.

mod accounts;

pub use accounts::AccountStore;
