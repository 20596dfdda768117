//! Transfer engine errors
//!
//! Distinguishes business rejections, which are final, from transient
//! storage conflicts, which the engine retries internally.

use rust_decimal::Decimal;

/// Errors produced by the transfer engine.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Source or destination account does not exist. Deliberately does not
    /// say which one, so callers cannot probe for account ids.
    #[error("Account not found")]
    AccountNotFound,

    /// The requester does not own the source account.
    #[error("Permission denied: requester does not own the source account")]
    PermissionDenied,

    /// The source balance does not cover the amount.
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Transfer aborted after {0} conflicting attempts")]
    MaxRetriesExceeded(u32),
}

impl TransferError {
    /// Business rejections are caller-attributable and must never be
    /// retried.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound | Self::PermissionDenied | Self::InsufficientFunds { .. }
        )
    }

    /// Serialization conflicts abort with no partial effect and are safe to
    /// retry from the top of the atomic section.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database(e) => is_serialization_conflict(e),
            _ => false,
        }
    }
}

/// PostgreSQL reports a lost serializable race as SQLSTATE 40001 and a
/// deadlock between conflicting row locks as 40P01. Both leave the
/// transaction rolled back.
pub(crate) fn is_serialization_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            matches!(db.code().as_deref(), Some("40001") | Some("40P01"))
        }
        _ => false,
    }
}
