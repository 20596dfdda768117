//! Command handlers module
//!
//! Orchestration of state-changing operations. The transfer handler owns
//! the only mutation path for account balances.

mod commands;
mod error;
mod transfer_handler;

pub use commands::{TransferCommand, TransferOutcome};
pub use error::TransferError;
pub use transfer_handler::TransferHandler;
