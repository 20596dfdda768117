//! Transaction query module
//!
//! Filtered, cursor-paginated read access to the transaction log.

pub mod filter;
mod service;

pub use filter::{resolve_page_size, MonthFilter, TransactionFilter, DEFAULT_PAGE_SIZE};
pub use service::{Page, TransactionQuery};
