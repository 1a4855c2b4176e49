//! Drive endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{DataResponse, DriveFilterParams, MessageResponse};
use crate::app_state::AppState;
use crate::domain::{Drive, DriveUpdate, RecordId};
use crate::error::{AdminError, ErrorResponse};

/// `GET /api/drive` — List drives, newest first.
///
/// # Errors
///
/// Returns [`AdminError::InvalidRequest`] for an unknown status.
#[utoipa::path(
    get,
    path = "/api/drive",
    tag = "Drives",
    summary = "List drives",
    params(DriveFilterParams),
    responses(
        (status = 200, description = "Matching drives", body = DataResponse<Vec<Drive>>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
    )
)]
pub async fn list_drives(
    State(state): State<AppState>,
    Query(params): Query<DriveFilterParams>,
) -> Result<impl IntoResponse, AdminError> {
    let drives = state.drive_service.list(&params.to_filter()?).await?;
    Ok(Json(DataResponse::new(drives)))
}

/// `GET /api/drive/{id}` — Fetch one drive.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] if the id is unknown.
#[utoipa::path(
    get,
    path = "/api/drive/{id}",
    tag = "Drives",
    summary = "Get a drive",
    params(
        ("id" = String, Path, description = "Record UUID"),
    ),
    responses(
        (status = 200, description = "Drive", body = DataResponse<Drive>),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn get_drive(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<impl IntoResponse, AdminError> {
    let drive = state.drive_service.get(id).await?;
    Ok(Json(DataResponse::new(drive)))
}

/// `PUT /api/drive/{id}` — Edit a drive.
///
/// # Errors
///
/// - [`AdminError::NotFound`] if the id is unknown.
/// - [`AdminError::InvalidRequest`] if the end date would precede the start
///   or the coordinates are out of range.
#[utoipa::path(
    put,
    path = "/api/drive/{id}",
    tag = "Drives",
    summary = "Update a drive",
    params(
        ("id" = String, Path, description = "Record UUID"),
    ),
    request_body = DriveUpdate,
    responses(
        (status = 200, description = "Updated drive", body = DataResponse<Drive>),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn update_drive(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(update): Json<DriveUpdate>,
) -> Result<impl IntoResponse, AdminError> {
    let drive = state.drive_service.update(id, update).await?;
    Ok(Json(DataResponse::new(drive)))
}

/// `DELETE /api/drive/{id}` — Delete a drive.
///
/// # Errors
///
/// Returns [`AdminError::NotFound`] if the id is unknown.
#[utoipa::path(
    delete,
    path = "/api/drive/{id}",
    tag = "Drives",
    summary = "Delete a drive",
    params(
        ("id" = String, Path, description = "Record UUID"),
    ),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn delete_drive(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<impl IntoResponse, AdminError> {
    state.drive_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Drive deleted successfully")))
}

/// Drive routes, relative to `/api`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/drive", get(list_drives)).route(
        "/drive/{id}",
        get(get_drive).put(update_drive).delete(delete_drive),
    )
}
