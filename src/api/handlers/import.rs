//! Bulk-entry endpoints: one JSON import, one CSV import and one template
//! per entry form.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use crate::api::dto::{ImportResponse, TemplateFormat, TemplateParams, extract_rows};
use crate::app_state::AppState;
use crate::domain::{
    Certificate, DonationRequest, Drive, Expenditure, NewCertificate, NewDonationRequest,
    NewDrive, NewExpenditure, NewTransaction, Transaction,
};
use crate::error::{AdminError, ErrorResponse};
use crate::import::{ImportRecord, ImportTemplate};
use crate::persistence::{CreateMany, RecordStore};
use crate::service::ImportService;

async fn run_import<N, R>(
    state: &AppState,
    body: Value,
    key: &str,
) -> Result<Json<ImportResponse>, AdminError>
where
    N: ImportRecord,
    R: Send + 'static,
    dyn RecordStore: CreateMany<N, R>,
{
    let rows = extract_rows(body, key, N::ENTITY)?;
    let summary = state.import_service.import::<N, R>(rows).await?;
    Ok(Json(summary.into()))
}

async fn run_csv_import<N, R>(state: &AppState, text: &str) -> Result<Json<ImportResponse>, AdminError>
where
    N: ImportRecord,
    R: Send + 'static,
    dyn RecordStore: CreateMany<N, R>,
{
    let summary = state.import_service.import_csv::<N, R>(text).await?;
    Ok(Json(summary.into()))
}

fn template<N: ImportRecord>(params: &TemplateParams) -> Result<Response, AdminError> {
    Ok(match params.format {
        TemplateFormat::Json => Json(ImportService::template::<N>()).into_response(),
        TemplateFormat::Csv => ImportService::template_csv::<N>()?.into_response(),
    })
}

/// `POST /api/admin/enterdata/transaction` — Bulk import transactions.
///
/// # Errors
///
/// Returns [`AdminError::EmptyImport`], [`AdminError::Validation`] or
/// [`AdminError::PartialImport`].
#[utoipa::path(
    post,
    path = "/api/admin/enterdata/transaction",
    tag = "Import",
    summary = "Import transactions",
    description = "Validates every row of `transactions`, then stores them in batches. \
                   Rows are keyed by template header (`name*`, `date (DD-MM-YYYY)*`, ...).",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "All rows stored", body = ImportResponse),
        (status = 400, description = "Empty upload or invalid rows", body = ErrorResponse),
        (status = 500, description = "A batch was rejected", body = ErrorResponse),
    )
)]
pub async fn import_transactions(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AdminError> {
    run_import::<NewTransaction, Transaction>(&state, body, "transactions").await
}

/// `POST /api/admin/enterdata/transaction/csv` — Import transactions from
/// CSV text.
///
/// # Errors
///
/// Returns [`AdminError::MalformedCsv`] in addition to the JSON import
/// errors.
#[utoipa::path(
    post,
    path = "/api/admin/enterdata/transaction/csv",
    tag = "Import",
    summary = "Import transactions from CSV",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "All rows stored", body = ImportResponse),
        (status = 400, description = "Malformed CSV or invalid rows", body = ErrorResponse),
        (status = 500, description = "A batch was rejected", body = ErrorResponse),
    )
)]
pub async fn import_transactions_csv(
    State(state): State<AppState>,
    text: String,
) -> Result<impl IntoResponse, AdminError> {
    run_csv_import::<NewTransaction, Transaction>(&state, &text).await
}

/// `GET /api/admin/enterdata/transaction` — Transaction import template.
///
/// # Errors
///
/// Returns [`AdminError::Export`] if the CSV template cannot be rendered.
#[utoipa::path(
    get,
    path = "/api/admin/enterdata/transaction",
    tag = "Import",
    summary = "Transaction import template",
    description = "Required and optional headers with example values; `?format=csv` downloads \
                   the template as a CSV file.",
    params(TemplateParams),
    responses(
        (status = 200, description = "Template", body = ImportTemplate),
    )
)]
pub async fn transaction_template(
    Query(params): Query<TemplateParams>,
) -> Result<Response, AdminError> {
    template::<NewTransaction>(&params)
}

/// `POST /api/admin/enterdata/drive` — Bulk import drives.
///
/// # Errors
///
/// Returns [`AdminError::EmptyImport`], [`AdminError::Validation`] or
/// [`AdminError::PartialImport`].
#[utoipa::path(
    post,
    path = "/api/admin/enterdata/drive",
    tag = "Import",
    summary = "Import drives",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "All rows stored", body = ImportResponse),
        (status = 400, description = "Empty upload or invalid rows", body = ErrorResponse),
        (status = 500, description = "A batch was rejected", body = ErrorResponse),
    )
)]
pub async fn import_drives(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AdminError> {
    run_import::<NewDrive, Drive>(&state, body, "drives").await
}

/// `POST /api/admin/enterdata/drive/csv` — Import drives from CSV text.
///
/// # Errors
///
/// Returns [`AdminError::MalformedCsv`] in addition to the JSON import
/// errors.
#[utoipa::path(
    post,
    path = "/api/admin/enterdata/drive/csv",
    tag = "Import",
    summary = "Import drives from CSV",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "All rows stored", body = ImportResponse),
        (status = 400, description = "Malformed CSV or invalid rows", body = ErrorResponse),
    )
)]
pub async fn import_drives_csv(
    State(state): State<AppState>,
    text: String,
) -> Result<impl IntoResponse, AdminError> {
    run_csv_import::<NewDrive, Drive>(&state, &text).await
}

/// `GET /api/admin/enterdata/drive` — Drive import template.
///
/// # Errors
///
/// Returns [`AdminError::Export`] if the CSV template cannot be rendered.
#[utoipa::path(
    get,
    path = "/api/admin/enterdata/drive",
    tag = "Import",
    summary = "Drive import template",
    params(TemplateParams),
    responses(
        (status = 200, description = "Template", body = ImportTemplate),
    )
)]
pub async fn drive_template(Query(params): Query<TemplateParams>) -> Result<Response, AdminError> {
    template::<NewDrive>(&params)
}

/// `POST /api/admin/enterdata/certificate` — Bulk import certificates.
///
/// # Errors
///
/// Returns [`AdminError::EmptyImport`], [`AdminError::Validation`] or
/// [`AdminError::PartialImport`].
#[utoipa::path(
    post,
    path = "/api/admin/enterdata/certificate",
    tag = "Import",
    summary = "Import certificates",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "All rows stored", body = ImportResponse),
        (status = 400, description = "Empty upload or invalid rows", body = ErrorResponse),
        (status = 500, description = "A batch was rejected", body = ErrorResponse),
    )
)]
pub async fn import_certificates(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AdminError> {
    run_import::<NewCertificate, Certificate>(&state, body, "certificates").await
}

/// `POST /api/admin/enterdata/certificate/csv` — Import certificates from
/// CSV text.
///
/// # Errors
///
/// Returns [`AdminError::MalformedCsv`] in addition to the JSON import
/// errors.
#[utoipa::path(
    post,
    path = "/api/admin/enterdata/certificate/csv",
    tag = "Import",
    summary = "Import certificates from CSV",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "All rows stored", body = ImportResponse),
        (status = 400, description = "Malformed CSV or invalid rows", body = ErrorResponse),
    )
)]
pub async fn import_certificates_csv(
    State(state): State<AppState>,
    text: String,
) -> Result<impl IntoResponse, AdminError> {
    run_csv_import::<NewCertificate, Certificate>(&state, &text).await
}

/// `GET /api/admin/enterdata/certificate` — Certificate import template.
///
/// # Errors
///
/// Returns [`AdminError::Export`] if the CSV template cannot be rendered.
#[utoipa::path(
    get,
    path = "/api/admin/enterdata/certificate",
    tag = "Import",
    summary = "Certificate import template",
    params(TemplateParams),
    responses(
        (status = 200, description = "Template", body = ImportTemplate),
    )
)]
pub async fn certificate_template(
    Query(params): Query<TemplateParams>,
) -> Result<Response, AdminError> {
    template::<NewCertificate>(&params)
}

/// `POST /api/admin/enterdata/donation-request` — Bulk import donation
/// requests.
///
/// # Errors
///
/// Returns [`AdminError::EmptyImport`], [`AdminError::Validation`] or
/// [`AdminError::PartialImport`].
#[utoipa::path(
    post,
    path = "/api/admin/enterdata/donation-request",
    tag = "Import",
    summary = "Import donation requests",
    description = "Rows are read from the `donations` array; every request is stored as Pending.",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "All rows stored", body = ImportResponse),
        (status = 400, description = "Empty upload or invalid rows", body = ErrorResponse),
        (status = 500, description = "A batch was rejected", body = ErrorResponse),
    )
)]
pub async fn import_donation_requests(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AdminError> {
    run_import::<NewDonationRequest, DonationRequest>(&state, body, "donations").await
}

/// `POST /api/admin/enterdata/donation-request/csv` — Import donation
/// requests from CSV text.
///
/// # Errors
///
/// Returns [`AdminError::MalformedCsv`] in addition to the JSON import
/// errors.
#[utoipa::path(
    post,
    path = "/api/admin/enterdata/donation-request/csv",
    tag = "Import",
    summary = "Import donation requests from CSV",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "All rows stored", body = ImportResponse),
        (status = 400, description = "Malformed CSV or invalid rows", body = ErrorResponse),
    )
)]
pub async fn import_donation_requests_csv(
    State(state): State<AppState>,
    text: String,
) -> Result<impl IntoResponse, AdminError> {
    run_csv_import::<NewDonationRequest, DonationRequest>(&state, &text).await
}

/// `GET /api/admin/enterdata/donation-request` — Donation request import
/// template.
///
/// # Errors
///
/// Returns [`AdminError::Export`] if the CSV template cannot be rendered.
#[utoipa::path(
    get,
    path = "/api/admin/enterdata/donation-request",
    tag = "Import",
    summary = "Donation request import template",
    params(TemplateParams),
    responses(
        (status = 200, description = "Template", body = ImportTemplate),
    )
)]
pub async fn donation_request_template(
    Query(params): Query<TemplateParams>,
) -> Result<Response, AdminError> {
    template::<NewDonationRequest>(&params)
}

/// `POST /api/admin/enterdata/expenditure` — Bulk import expenditures.
///
/// # Errors
///
/// Returns [`AdminError::EmptyImport`], [`AdminError::Validation`] or
/// [`AdminError::PartialImport`].
#[utoipa::path(
    post,
    path = "/api/admin/enterdata/expenditure",
    tag = "Import",
    summary = "Import expenditures",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "All rows stored", body = ImportResponse),
        (status = 400, description = "Empty upload or invalid rows", body = ErrorResponse),
        (status = 500, description = "A batch was rejected", body = ErrorResponse),
    )
)]
pub async fn import_expenditures(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AdminError> {
    run_import::<NewExpenditure, Expenditure>(&state, body, "expenditures").await
}

/// `POST /api/admin/enterdata/expenditure/csv` — Import expenditures from
/// CSV text.
///
/// # Errors
///
/// Returns [`AdminError::MalformedCsv`] in addition to the JSON import
/// errors.
#[utoipa::path(
    post,
    path = "/api/admin/enterdata/expenditure/csv",
    tag = "Import",
    summary = "Import expenditures from CSV",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "All rows stored", body = ImportResponse),
        (status = 400, description = "Malformed CSV or invalid rows", body = ErrorResponse),
    )
)]
pub async fn import_expenditures_csv(
    State(state): State<AppState>,
    text: String,
) -> Result<impl IntoResponse, AdminError> {
    run_csv_import::<NewExpenditure, Expenditure>(&state, &text).await
}

/// `GET /api/admin/enterdata/expenditure` — Expenditure import template.
///
/// # Errors
///
/// Returns [`AdminError::Export`] if the CSV template cannot be rendered.
#[utoipa::path(
    get,
    path = "/api/admin/enterdata/expenditure",
    tag = "Import",
    summary = "Expenditure import template",
    params(TemplateParams),
    responses(
        (status = 200, description = "Template", body = ImportTemplate),
    )
)]
pub async fn expenditure_template(
    Query(params): Query<TemplateParams>,
) -> Result<Response, AdminError> {
    template::<NewExpenditure>(&params)
}

/// Import routes, relative to `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/enterdata/transaction",
            post(import_transactions).get(transaction_template),
        )
        .route("/admin/enterdata/transaction/csv", post(import_transactions_csv))
        .route("/admin/enterdata/drive", post(import_drives).get(drive_template))
        .route("/admin/enterdata/drive/csv", post(import_drives_csv))
        .route(
            "/admin/enterdata/certificate",
            post(import_certificates).get(certificate_template),
        )
        .route("/admin/enterdata/certificate/csv", post(import_certificates_csv))
        .route(
            "/admin/enterdata/donation-request",
            post(import_donation_requests).get(donation_request_template),
        )
        .route(
            "/admin/enterdata/donation-request/csv",
            post(import_donation_requests_csv),
        )
        .route(
            "/admin/enterdata/expenditure",
            post(import_expenditures).get(expenditure_template),
        )
        .route("/admin/enterdata/expenditure/csv", post(import_expenditures_csv))
}
