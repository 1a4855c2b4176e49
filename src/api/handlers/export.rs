//! Admin export endpoint.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::AdminExportParams;
use crate::app_state::AppState;
use crate::error::{AdminError, ErrorResponse};
use crate::export::ExportFormat;

/// `GET /api/admin` — Export one dataset.
///
/// `format=json` returns the rows inline; `csv` and `xlsx` return an
/// attachment named after the dataset.
///
/// # Errors
///
/// - [`AdminError::InvalidRequest`] for a missing or unknown `type`.
/// - [`AdminError::Export`] if the file cannot be rendered.
#[utoipa::path(
    get,
    path = "/api/admin",
    tag = "Export",
    summary = "Export drives, users or donation requests",
    params(AdminExportParams),
    responses(
        (status = 200, description = "Rows as JSON, or a CSV/XLSX attachment", body = Vec<serde_json::Value>),
        (status = 400, description = "Invalid data type or filter", body = ErrorResponse),
    )
)]
pub async fn export_data(
    State(state): State<AppState>,
    Query(params): Query<AdminExportParams>,
) -> Result<Response, AdminError> {
    let kind = params.kind()?;
    let criteria = params.criteria()?;
    let table = state.export_service.table(kind, &criteria).await?;
    tracing::info!(
        kind = kind.file_stem(),
        rows = table.rows.len(),
        format = params.format.extension(),
        "admin export"
    );

    Ok(match params.format {
        ExportFormat::Json => Json(table.to_json()).into_response(),
        format => table.into_file(kind.file_stem(), format)?.into_response(),
    })
}

/// Export routes, relative to `/api`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin", get(export_data))
}
