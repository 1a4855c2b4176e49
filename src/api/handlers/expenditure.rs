//! Expenditure endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{DataResponse, ExpenditureFilterParams, MessageResponse};
use crate::app_state::AppState;
use crate::domain::{Expenditure, ExpenditureStats, ExpenditureUpdate, RecordId};
use crate::error::{AdminError, ErrorResponse};
use crate::import::RawRow;

/// `GET /api/admin/expenditures` — List expenditures, latest date first.
///
/// # Errors
///
/// Returns [`AdminError::InvalidRequest`] for a bad filter.
#[utoipa::path(
    get,
    path = "/api/admin/expenditures",
    tag = "Expenditures",
    summary = "List expenditures",
    params(ExpenditureFilterParams),
    responses(
        (status = 200, description = "Matching expenditures", body = DataResponse<Vec<Expenditure>>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
    )
)]
pub async fn list_expenditures(
    State(state): State<AppState>,
    Query(params): Query<ExpenditureFilterParams>,
) -> Result<impl IntoResponse, AdminError> {
    let items = state.expenditure_service.list(&params.to_filter()?).await?;
    Ok(Json(DataResponse::new(items)))
}

/// `POST /api/admin/expenditures` — Record one expenditure.
///
/// # Errors
///
/// Returns [`AdminError::Validation`] keyed by row `0` for invalid fields.
#[utoipa::path(
    post,
    path = "/api/admin/expenditures",
    tag = "Expenditures",
    summary = "Record an expenditure",
    description = "Fields use the expenditure import headers or their plain names \
                   (`amount`, `date`, `category`, ...).",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Expenditure stored", body = DataResponse<Expenditure>),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
    )
)]
pub async fn create_expenditure(
    State(state): State<AppState>,
    Json(row): Json<RawRow>,
) -> Result<impl IntoResponse, AdminError> {
    let exp = state.expenditure_service.create(row).await?;
    Ok(Json(DataResponse::new(exp)))
}

/// `GET /api/admin/expenditures/stats` — Totals by category.
///
/// # Errors
///
/// Returns [`AdminError::InvalidRequest`] for a bad filter.
#[utoipa::path(
    get,
    path = "/api/admin/expenditures/stats",
    tag = "Expenditures",
    summary = "Expenditure totals",
    params(ExpenditureFilterParams),
    responses(
        (status = 200, description = "Totals", body = DataResponse<ExpenditureStats>),
    )
)]
pub async fn expenditure_stats(
    State(state): State<AppState>,
    Query(params): Query<ExpenditureFilterParams>,
) -> Result<impl IntoResponse, AdminError> {
    let stats = state.expenditure_service.stats(&params.to_filter()?).await?;
    Ok(Json(DataResponse::new(stats)))
}

/// `GET /api/admin/expenditures/{id}` — Fetch one expenditure.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/admin/expenditures/{id}",
    tag = "Expenditures",
    summary = "Get an expenditure",
    params(
        ("id" = String, Path, description = "Record UUID"),
    ),
    responses(
        (status = 200, description = "Expenditure", body = DataResponse<Expenditure>),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn get_expenditure(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<impl IntoResponse, AdminError> {
    let exp = state.expenditure_service.get(id).await?;
    Ok(Json(DataResponse::new(exp)))
}

/// `PUT /api/admin/expenditures/{id}` — Edit an expenditure.
///
/// # Errors
///
/// - [`AdminError::NotFound`] if the id is unknown.
/// - [`AdminError::Validation`] if the edit breaks an invariant.
#[utoipa::path(
    put,
    path = "/api/admin/expenditures/{id}",
    tag = "Expenditures",
    summary = "Update an expenditure",
    params(
        ("id" = String, Path, description = "Record UUID"),
    ),
    request_body = ExpenditureUpdate,
    responses(
        (status = 200, description = "Updated expenditure", body = DataResponse<Expenditure>),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn update_expenditure(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(update): Json<ExpenditureUpdate>,
) -> Result<impl IntoResponse, AdminError> {
    let exp = state.expenditure_service.update(id, update).await?;
    Ok(Json(DataResponse::new(exp)))
}

/// `DELETE /api/admin/expenditures/{id}` — Delete an expenditure.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] if the id is unknown.
#[utoipa::path(
    delete,
    path = "/api/admin/expenditures/{id}",
    tag = "Expenditures",
    summary = "Delete an expenditure",
    params(
        ("id" = String, Path, description = "Record UUID"),
    ),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn delete_expenditure(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<impl IntoResponse, AdminError> {
    state.expenditure_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Expenditure deleted successfully")))
}

/// Expenditure routes, relative to `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/expenditures",
            get(list_expenditures).post(create_expenditure),
        )
        .route("/admin/expenditures/stats", get(expenditure_stats))
        .route(
            "/admin/expenditures/{id}",
            get(get_expenditure)
                .put(update_expenditure)
                .delete(delete_expenditure),
        )
}
