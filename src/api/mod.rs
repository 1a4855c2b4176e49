//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api`; `/health` sits at the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Pasaydan Admin API",
        description = "Bulk data entry, transaction verification, expenditures and exports."
    ),
    paths(
        handlers::system::health_handler,
        handlers::import::import_transactions,
        handlers::import::import_transactions_csv,
        handlers::import::transaction_template,
        handlers::import::import_drives,
        handlers::import::import_drives_csv,
        handlers::import::drive_template,
        handlers::import::import_certificates,
        handlers::import::import_certificates_csv,
        handlers::import::certificate_template,
        handlers::import::import_donation_requests,
        handlers::import::import_donation_requests_csv,
        handlers::import::donation_request_template,
        handlers::import::import_expenditures,
        handlers::import::import_expenditures_csv,
        handlers::import::expenditure_template,
        handlers::transaction::create_transaction,
        handlers::transaction::list_transactions,
        handlers::transaction::transaction_stats,
        handlers::transaction::export_transactions,
        handlers::transaction::get_transaction,
        handlers::transaction::update_transaction,
        handlers::transaction::delete_transaction,
        handlers::transaction::verify_transaction,
        handlers::transaction::reject_transaction,
        handlers::transaction::reopen_transaction,
        handlers::expenditure::list_expenditures,
        handlers::expenditure::create_expenditure,
        handlers::expenditure::expenditure_stats,
        handlers::expenditure::get_expenditure,
        handlers::expenditure::update_expenditure,
        handlers::expenditure::delete_expenditure,
        handlers::drive::list_drives,
        handlers::drive::get_drive,
        handlers::drive::update_drive,
        handlers::drive::delete_drive,
        handlers::export::export_data,
    ),
    tags(
        (name = "Import", description = "Bulk entry from JSON rows or CSV files"),
        (name = "Transactions", description = "Donation and payment records"),
        (name = "Expenditures", description = "Money spent by the NGO"),
        (name = "Drives", description = "Donation-collection events"),
        (name = "Export", description = "Dataset downloads"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}

/// Router with state and the HTTP middleware stack applied.
pub fn build_app(state: AppState, max_upload_bytes: usize) -> Router {
    build_router()
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::import::BatchImporter;
    use crate::persistence::{InMemoryStore, LocalFileStore};

    fn app(upload_root: &std::path::Path) -> Router {
        let state = AppState::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(LocalFileStore::new(upload_root)),
            BatchImporter::default(),
        );
        build_app(state, 1024 * 1024)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let Ok(response) = app.oneshot(request).await else {
            panic!("router is infallible");
        };
        let status = response.status();
        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body");
        };
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        let Ok(request) = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("request");
        };
        request
    }

    fn get(uri: &str) -> Request<Body> {
        let Ok(request) = Request::get(uri).body(Body::empty()) else {
            panic!("request");
        };
        request
    }

    #[test]
    fn openapi_lists_import_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/admin/enterdata/transaction"));
        assert!(doc.paths.paths.contains_key("/api/admin/transactions/{id}/verify"));
    }

    #[tokio::test]
    async fn health_is_served_at_root() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let (status, body) = send(app(dir.path()), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn empty_transaction_import_is_rejected() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let request = post_json(
            "/api/admin/enterdata/transaction",
            &json!({ "transactions": [] }),
        );
        let (status, body) = send(app(dir.path()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "No transaction data provided");
    }

    #[tokio::test]
    async fn admin_export_requires_known_type() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let (status, body) = send(app(dir.path()), get("/api/admin?type=orders")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid data type");
    }

    #[tokio::test]
    async fn unknown_transaction_is_not_found() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let uri = format!("/api/admin/transactions/{}", uuid::Uuid::new_v4());
        let (status, body) = send(app(dir.path()), get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 2001);
    }
}
