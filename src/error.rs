//! Admin error types with HTTP status code mapping.
//!
//! [`AdminError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and a structured JSON error body.
//! Validators and transformers never produce these for expected bad input;
//! they return error lists which the import service wraps into
//! [`AdminError::Validation`] at the boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::import::ValidationReport;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "success": false,
///   "code": 1001,
///   "error": "Validation failed",
///   "details": { "1": ["Invalid email format"] }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Numeric error code (see [`AdminError`] code ranges).
    pub code: u32,
    /// Human-readable error message.
    pub error: String,
    /// Optional structured details (per-row validation messages, committed
    /// count after a partial import).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub details: Option<serde_json::Value>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status               |
/// |-----------|------------------|---------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request           |
/// | 2000–2999 | Not Found        | 404 Not Found             |
/// | 3000–3999 | Server           | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// An import request carried no rows.
    #[error("No {0} data provided")]
    EmptyImport(&'static str),

    /// One or more rows failed field validation.
    #[error("Validation failed")]
    Validation(ValidationReport),

    /// Request validation failed outside the row pipeline.
    #[error("{0}")]
    InvalidRequest(String),

    /// Uploaded CSV text could not be parsed.
    #[error("malformed CSV: {0}")]
    MalformedCsv(String),

    /// Record with the given id was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind (e.g. `"transaction"`).
        entity: &'static str,
        /// Requested identifier.
        id: String,
    },

    /// A batch failed after earlier batches were committed.
    #[error("{message}")]
    PartialImport {
        /// Records committed by earlier batches.
        committed: usize,
        /// Underlying persistence message.
        message: String,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Screenshot or other file could not be written.
    #[error("file storage error: {0}")]
    FileStorage(String),

    /// Export serialization failed.
    #[error("export error: {0}")]
    Export(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AdminError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::EmptyImport(_) => 1000,
            Self::Validation(_) => 1001,
            Self::InvalidRequest(_) => 1002,
            Self::MalformedCsv(_) => 1003,
            Self::NotFound { .. } => 2001,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::PartialImport { .. } => 3002,
            Self::FileStorage(_) => 3003,
            Self::Export(_) => 3004,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyImport(_)
            | Self::Validation(_)
            | Self::InvalidRequest(_)
            | Self::MalformedCsv(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::PartialImport { .. }
            | Self::Persistence(_)
            | Self::FileStorage(_)
            | Self::Export(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Shorthand for [`AdminError::NotFound`].
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation(report) => serde_json::to_value(report).ok(),
            Self::PartialImport { committed, .. } => {
                Some(serde_json::json!({ "committed": committed }))
            }
            _ => None,
        }
    }

    /// Message shown to the client. Internal errors are replaced by a
    /// generic message; the real one is only logged.
    fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for AdminError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            success: false,
            code: self.error_code(),
            error: self.public_message(),
            details: self.details(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_import_message_names_entity() {
        let err = AdminError::EmptyImport("transaction");
        assert_eq!(err.to_string(), "No transaction data provided");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_details_are_keyed_by_row() {
        let mut report = ValidationReport::default();
        report.push(1, "Invalid email format".to_string());
        let err = AdminError::Validation(report);
        let Some(details) = err.details() else {
            panic!("expected details");
        };
        assert_eq!(
            details,
            serde_json::json!({ "1": ["Invalid email format"] })
        );
    }

    #[test]
    fn partial_import_reports_committed_count() {
        let err = AdminError::PartialImport {
            committed: 100,
            message: "duplicate transaction id".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "duplicate transaction id");
        assert_eq!(err.details(), Some(serde_json::json!({ "committed": 100 })));
    }

    #[test]
    fn internal_errors_are_masked() {
        let err = AdminError::Internal("db pool poisoned".to_string());
        assert_eq!(err.public_message(), "An unexpected error occurred");
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = AdminError::not_found("drive", "abc");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "drive not found: abc");
    }
}
