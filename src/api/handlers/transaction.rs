//! Transaction administration endpoints.

use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    DataResponse, MessageResponse, PaginationMeta, PaginationParams, RejectRequest,
    TransactionExportParams, TransactionFilterParams, TransactionListResponse, VerifyRequest,
};
use crate::app_state::AppState;
use crate::domain::{RecordId, StatusChange, Transaction, TransactionStats, TransactionUpdate};
use crate::error::{AdminError, ErrorResponse};
use crate::import::RawRow;
use crate::service::Upload;

/// Form field carrying the payment screenshot.
const SCREENSHOT_FIELD: &str = "screenshot";

/// `POST /api/admin/transactions` — Record one transaction.
///
/// Accepts either a JSON object or a `multipart/form-data` form whose
/// `screenshot` part is stored as the payment proof.
///
/// # Errors
///
/// - [`AdminError::InvalidRequest`] for an unreadable body.
/// - [`AdminError::Validation`] keyed by row `0` for invalid fields.
/// - [`AdminError::FileStorage`] when the screenshot cannot be stored.
#[utoipa::path(
    post,
    path = "/api/admin/transactions",
    tag = "Transactions",
    summary = "Record a transaction",
    description = "Fields use the transaction import headers or their plain names \
                   (`name`, `amount`, `type`, ...). `entryType` defaults to MANUAL.",
    request_body(content = serde_json::Value, description = "JSON object or multipart form"),
    responses(
        (status = 200, description = "Transaction stored", body = DataResponse<Transaction>),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse, AdminError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let (row, screenshot) = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AdminError::InvalidRequest(e.body_text()))?;
        read_form(multipart).await?
    } else {
        let Json(row) = Json::<RawRow>::from_request(request, &state)
            .await
            .map_err(|e| AdminError::InvalidRequest(e.body_text()))?;
        (row, None)
    };

    let tx = state.transaction_service.create(row, screenshot).await?;
    Ok(Json(DataResponse::new(tx)))
}

async fn read_form(mut multipart: Multipart) -> Result<(RawRow, Option<Upload>), AdminError> {
    let mut row = RawRow::new();
    let mut screenshot = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AdminError::InvalidRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == SCREENSHOT_FIELD {
            let file_name = field.file_name().unwrap_or(SCREENSHOT_FIELD).to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AdminError::InvalidRequest(e.body_text()))?;
            if !bytes.is_empty() {
                screenshot = Some(Upload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
        } else if !name.is_empty() {
            let text = field
                .text()
                .await
                .map_err(|e| AdminError::InvalidRequest(e.body_text()))?;
            row.insert(name, text);
        }
    }
    Ok((row, screenshot))
}

/// `GET /api/admin/transactions` — Paginated listing, newest first.
///
/// # Errors
///
/// Returns [`AdminError::InvalidRequest`] for a bad filter.
#[utoipa::path(
    get,
    path = "/api/admin/transactions",
    tag = "Transactions",
    summary = "List transactions",
    params(PaginationParams, TransactionFilterParams),
    responses(
        (status = 200, description = "One page of transactions", body = TransactionListResponse),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(params): Query<TransactionFilterParams>,
) -> Result<impl IntoResponse, AdminError> {
    let filter = params.to_filter()?;
    let page = pagination.clamped();
    let result = state.transaction_service.list(&filter, page).await?;

    Ok(Json(TransactionListResponse {
        success: true,
        data: result.items,
        pagination: PaginationMeta::new(page, result.total),
    }))
}

/// `GET /api/admin/transactions/stats` — Dashboard totals.
///
/// # Errors
///
/// Returns [`AdminError::InvalidRequest`] for a bad filter.
#[utoipa::path(
    get,
    path = "/api/admin/transactions/stats",
    tag = "Transactions",
    summary = "Transaction totals",
    params(TransactionFilterParams),
    responses(
        (status = 200, description = "Totals", body = DataResponse<TransactionStats>),
    )
)]
pub async fn transaction_stats(
    State(state): State<AppState>,
    Query(params): Query<TransactionFilterParams>,
) -> Result<impl IntoResponse, AdminError> {
    let stats = state.transaction_service.stats(&params.to_filter()?).await?;
    Ok(Json(DataResponse::new(stats)))
}

/// `GET /api/admin/transactions/export` — Download matching transactions.
///
/// # Errors
///
/// Returns [`AdminError::Export`] if the file cannot be rendered.
#[utoipa::path(
    get,
    path = "/api/admin/transactions/export",
    tag = "Transactions",
    summary = "Export transactions",
    params(TransactionExportParams, TransactionFilterParams),
    responses(
        (status = 200, description = "CSV or XLSX attachment"),
    )
)]
pub async fn export_transactions(
    State(state): State<AppState>,
    Query(export): Query<TransactionExportParams>,
    Query(params): Query<TransactionFilterParams>,
) -> Result<impl IntoResponse, AdminError> {
    state
        .transaction_service
        .export(&params.to_filter()?, export.format)
        .await
}

/// `GET /api/admin/transactions/{id}` — Fetch one transaction.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/admin/transactions/{id}",
    tag = "Transactions",
    summary = "Get a transaction",
    params(
        ("id" = String, Path, description = "Record UUID"),
    ),
    responses(
        (status = 200, description = "Transaction", body = DataResponse<Transaction>),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<impl IntoResponse, AdminError> {
    let tx = state.transaction_service.get(id).await?;
    Ok(Json(DataResponse::new(tx)))
}

/// `PUT /api/admin/transactions/{id}` — Edit a transaction.
///
/// # Errors
///
/// - [`AdminError::NotFound`] if the id is unknown.
/// - [`AdminError::InvalidRequest`] if the edit breaks an invariant.
#[utoipa::path(
    put,
    path = "/api/admin/transactions/{id}",
    tag = "Transactions",
    summary = "Update a transaction",
    params(
        ("id" = String, Path, description = "Record UUID"),
    ),
    request_body = TransactionUpdate,
    responses(
        (status = 200, description = "Updated transaction", body = DataResponse<Transaction>),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(update): Json<TransactionUpdate>,
) -> Result<impl IntoResponse, AdminError> {
    let tx = state.transaction_service.update(id, update).await?;
    Ok(Json(DataResponse::new(tx)))
}

/// `DELETE /api/admin/transactions/{id}` — Delete a transaction.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] if the id is unknown.
#[utoipa::path(
    delete,
    path = "/api/admin/transactions/{id}",
    tag = "Transactions",
    summary = "Delete a transaction",
    params(
        ("id" = String, Path, description = "Record UUID"),
    ),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<impl IntoResponse, AdminError> {
    state.transaction_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Transaction deleted successfully")))
}

/// `POST /api/admin/transactions/{id}/verify` — Mark as verified.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] if the id is unknown.
#[utoipa::path(
    post,
    path = "/api/admin/transactions/{id}/verify",
    tag = "Transactions",
    summary = "Verify a transaction",
    params(
        ("id" = String, Path, description = "Record UUID"),
    ),
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verified", body = DataResponse<Transaction>),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn verify_transaction(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(req): Json<VerifyRequest>,
) -> Result<impl IntoResponse, AdminError> {
    if req.verified_by.trim().is_empty() {
        return Err(AdminError::InvalidRequest("verifiedBy is required".to_string()));
    }
    let change = StatusChange::Verify {
        verified_by: req.verified_by.trim().to_string(),
    };
    let tx = state.transaction_service.change_status(id, change).await?;
    Ok(Json(DataResponse::new(tx)))
}

/// `POST /api/admin/transactions/{id}/reject` — Mark as rejected.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] if the id is unknown.
#[utoipa::path(
    post,
    path = "/api/admin/transactions/{id}/reject",
    tag = "Transactions",
    summary = "Reject a transaction",
    params(
        ("id" = String, Path, description = "Record UUID"),
    ),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Rejected", body = DataResponse<Transaction>),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn reject_transaction(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(req): Json<RejectRequest>,
) -> Result<impl IntoResponse, AdminError> {
    let change = StatusChange::Reject {
        reason: req.status_description.filter(|r| !r.trim().is_empty()),
    };
    let tx = state.transaction_service.change_status(id, change).await?;
    Ok(Json(DataResponse::new(tx)))
}

/// `POST /api/admin/transactions/{id}/reopen` — Move back to pending.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] if the id is unknown.
#[utoipa::path(
    post,
    path = "/api/admin/transactions/{id}/reopen",
    tag = "Transactions",
    summary = "Reopen a transaction",
    params(
        ("id" = String, Path, description = "Record UUID"),
    ),
    responses(
        (status = 200, description = "Pending again", body = DataResponse<Transaction>),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn reopen_transaction(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<impl IntoResponse, AdminError> {
    let tx = state
        .transaction_service
        .change_status(id, StatusChange::Reopen)
        .await?;
    Ok(Json(DataResponse::new(tx)))
}

/// Transaction routes, relative to `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/admin/transactions/stats", get(transaction_stats))
        .route("/admin/transactions/export", get(export_transactions))
        .route(
            "/admin/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .route("/admin/transactions/{id}/verify", post(verify_transaction))
        .route("/admin/transactions/{id}/reject", post(reject_transaction))
        .route("/admin/transactions/{id}/reopen", post(reopen_transaction))
}
