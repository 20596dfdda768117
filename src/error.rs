//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::handlers::TransferError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing or invalid identity")]
    MissingIdentity,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Transaction not found: {0}")]
    RecordNotFound(String),

    // Transfer engine failures (rejections map to 403)
    #[error(transparent)]
    Transfer(#[from] TransferError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    /// Status code and machine-readable error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::MissingIdentity => (StatusCode::UNAUTHORIZED, "missing_identity"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::AccountNotFound(_) => (StatusCode::NOT_FOUND, "account_not_found"),
            AppError::RecordNotFound(_) => (StatusCode::NOT_FOUND, "transaction_not_found"),

            // All transfer rejections are 403: the caller was authenticated
            // but the operation was refused, and missing accounts are not
            // distinguishable from foreign ones.
            AppError::Transfer(e) => match e {
                TransferError::AccountNotFound => (StatusCode::FORBIDDEN, "account_not_found"),
                TransferError::PermissionDenied => (StatusCode::FORBIDDEN, "permission_denied"),
                TransferError::InsufficientFunds { .. } => {
                    (StatusCode::FORBIDDEN, "insufficient_funds")
                }
                TransferError::Database(_) | TransferError::MaxRetriesExceeded(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                }
            },

            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        // Server-side failures are logged with full context; the caller
        // only receives an opaque message.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, error_code, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: message,
            error_code: error_code.to_string(),
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_client_error_status_mapping() {
        let (status, code) = AppError::InvalidRequest("bad amount".into()).status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "invalid_request");

        let (status, _) = AppError::MissingIdentity.status_and_code();
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = AppError::AccountNotFound("abc".into()).status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_transfer_rejections_map_to_403() {
        for err in [
            TransferError::AccountNotFound,
            TransferError::PermissionDenied,
            TransferError::InsufficientFunds {
                required: dec!(30),
                available: dec!(10),
            },
        ] {
            let (status, _) = AppError::Transfer(err).status_and_code();
            assert_eq!(status, StatusCode::FORBIDDEN);
        }
    }

    #[test]
    fn test_transfer_exhaustion_is_internal() {
        let (status, code) = AppError::Transfer(TransferError::MaxRetriesExceeded(3))
            .status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "internal_error");
    }
}
