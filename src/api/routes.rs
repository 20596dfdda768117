//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::{AnalyticsReport, AnalyticsService};
use crate::domain::{Account, TransactionRecord, TransactionRow};
use crate::error::AppError;
use crate::handlers::{TransferCommand, TransferHandler};
use crate::query::{resolve_page_size, TransactionFilter, TransactionQuery};
use crate::store::AccountStore;

use super::middleware::AuthenticatedUser;
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub source_account_id: Uuid,
    pub dest_account_id: Uuid,
    pub amount: Decimal,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub sender_record_id: Uuid,
    pub receiver_record_id: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListParams {
    #[serde(default)]
    pub min_amount: Option<Decimal>,
    #[serde(default)]
    pub max_amount: Option<Decimal>,
    /// Calendar month, "MM-YYYY" or "MM-YY"
    #[serde(default)]
    pub month: Option<String>,
    /// Raw text: absent or non-numeric falls back to the default
    #[serde(default)]
    pub items_per_page: Option<String>,
    /// Id of the last record of the previous page
    #[serde(default)]
    pub last_item_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub items_per_page: i64,
    pub next_cursor_id: Option<Uuid>,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListResponse {
    pub data: Vec<TransactionRecord>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    pub category: String,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account).get(list_accounts))
        .route("/accounts/me", get(my_account))
        .route("/accounts/:account_id", get(get_account))
        .route("/transfers", post(transfer))
        .route("/transactions", get(list_transactions))
        .route(
            "/transactions/:record_id",
            patch(update_transaction).delete(delete_transaction),
        )
        .route("/analytics", get(analytics))
}

// =========================================================================
// POST /accounts
// =========================================================================

/// Create an account for the requester, funded with the seed balance.
async fn create_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let name = request.name.unwrap_or_else(|| "Main account".to_string());
    if name.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "Account name must not be empty".to_string(),
        ));
    }

    let store = AccountStore::new(state.pool.clone());
    let account = store
        .create(&user.user_id, name.trim(), state.seed_balance)
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

// =========================================================================
// GET /accounts
// =========================================================================

/// List all accounts, oldest first (transfer destination picker).
async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>, AppError> {
    let store = AccountStore::new(state.pool.clone());
    Ok(Json(store.list().await?))
}

// =========================================================================
// GET /accounts/me
// =========================================================================

/// The requester's primary account.
async fn my_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Account>, AppError> {
    let store = AccountStore::new(state.pool.clone());
    let account = store
        .find_by_owner(&user.user_id)
        .await?
        .ok_or_else(|| AppError::AccountNotFound(user.user_id.clone()))?;

    Ok(Json(account))
}

// =========================================================================
// GET /accounts/:account_id
// =========================================================================

/// Get account by id
async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Account>, AppError> {
    let store = AccountStore::new(state.pool.clone());
    let account = store
        .get(account_id)
        .await?
        .ok_or_else(|| AppError::AccountNotFound(account_id.to_string()))?;

    Ok(Json(account))
}

// =========================================================================
// POST /transfers
// =========================================================================

/// Move funds between two accounts atomically.
async fn transfer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferResponse>), AppError> {
    let handler = TransferHandler::new(state.pool.clone());

    let command = TransferCommand {
        source_account_id: request.source_account_id,
        dest_account_id: request.dest_account_id,
        amount: request.amount.to_string(),
        category: request.category,
    };

    let outcome = handler.execute(&user.user_id, command).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransferResponse {
            sender_record_id: outcome.sent_record_id,
            receiver_record_id: outcome.received_record_id,
            amount: outcome.amount,
        }),
    ))
}

// =========================================================================
// GET /transactions
// =========================================================================

/// Filtered, cursor-paginated listing of the requester's records.
async fn list_transactions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<TransactionListParams>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let month = params
        .month
        .as_deref()
        .map(|s| {
            s.parse()
                .map_err(|e| AppError::InvalidRequest(format!("{e}")))
        })
        .transpose()?;

    let filter = TransactionFilter {
        min_amount: params.min_amount,
        max_amount: params.max_amount,
        month,
    };

    let page_size = resolve_page_size(params.items_per_page.as_deref());

    // A cursor that does not parse is treated like one that no longer
    // resolves: pagination restarts from the top.
    let cursor = params
        .last_item_id
        .as_deref()
        .and_then(|s| Uuid::parse_str(s).ok());

    let service = TransactionQuery::new(state.pool.clone());
    let page = service.list(&user.user_id, &filter, page_size, cursor).await?;

    Ok(Json(TransactionListResponse {
        data: page.records,
        pagination: Pagination {
            items_per_page: page_size,
            next_cursor_id: page.next_cursor,
            has_more: page.has_more,
        },
    }))
}

// =========================================================================
// PATCH /transactions/:record_id
// =========================================================================

/// Edit a record's auxiliary metadata. Amount, endpoints, direction and
/// timestamps are immutable.
async fn update_transaction(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(record_id): Path<Uuid>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<TransactionRecord>, AppError> {
    let owner: Option<String> =
        sqlx::query_scalar("SELECT user_id FROM transactions WHERE id = $1")
            .bind(record_id)
            .fetch_optional(&state.pool)
            .await?;

    let owner = owner.ok_or_else(|| AppError::RecordNotFound(record_id.to_string()))?;
    if owner != user.user_id {
        return Err(AppError::Forbidden(
            "Only the owner may edit a transaction".to_string(),
        ));
    }

    let row: TransactionRow = sqlx::query_as(
        r#"
        UPDATE transactions
        SET category = $2
        WHERE id = $1
        RETURNING id, user_id, from_account_id, to_account_id, amount, direction,
                  category, counterparty, attachment, date, created_at
        "#,
    )
    .bind(record_id)
    .bind(&request.category)
    .fetch_one(&state.pool)
    .await?;

    let record = TransactionRecord::try_from(row)
        .map_err(AppError::Internal)?;

    Ok(Json(record))
}

// =========================================================================
// DELETE /transactions/:record_id
// =========================================================================

/// Delete a record. Owner only.
async fn delete_transaction(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(record_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let owner: Option<String> =
        sqlx::query_scalar("SELECT user_id FROM transactions WHERE id = $1")
            .bind(record_id)
            .fetch_optional(&state.pool)
            .await?;

    let owner = owner.ok_or_else(|| AppError::RecordNotFound(record_id.to_string()))?;
    if owner != user.user_id {
        return Err(AppError::Forbidden(
            "Only the owner may delete a transaction".to_string(),
        ));
    }

    sqlx::query("DELETE FROM transactions WHERE id = $1")
        .bind(record_id)
        .execute(&state.pool)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
// GET /analytics
// =========================================================================

/// Full-history KPIs and chart series for the requester.
async fn analytics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let service = AnalyticsService::new(state.pool.clone());
    let report = service.summarize(&user.user_id).await?;

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transfer_request_deserialize() {
        let json = r#"{
            "sourceAccountId": "550e8400-e29b-41d4-a716-446655440001",
            "destAccountId": "550e8400-e29b-41d4-a716-446655440002",
            "amount": 100.50,
            "category": "rent"
        }"#;

        let request: TransferRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, dec!(100.50));
        assert_eq!(request.category, Some("rent".to_string()));
    }

    #[test]
    fn test_list_params_all_optional() {
        let params: TransactionListParams = serde_json::from_str("{}").unwrap();
        assert!(params.min_amount.is_none());
        assert!(params.month.is_none());
        assert!(params.items_per_page.is_none());
        assert!(params.last_item_id.is_none());
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let pagination = Pagination {
            items_per_page: 100,
            next_cursor_id: None,
            has_more: false,
        };

        let json = serde_json::to_value(&pagination).unwrap();
        assert_eq!(json["itemsPerPage"], 100);
        assert_eq!(json["hasMore"], false);
        assert!(json["nextCursorId"].is_null());
    }
}
