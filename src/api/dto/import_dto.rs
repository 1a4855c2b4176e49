//! Bulk-import request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::error::AdminError;
use crate::import::RawRow;
use crate::service::ImportSummary;

/// Response of a successful import.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportResponse {
    /// Always `true`.
    pub success: bool,
    /// Entity-specific success message.
    pub message: String,
    /// Records stored.
    pub count: usize,
    /// Values replaced by forgiving defaults; omitted when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<ImportSummary> for ImportResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            success: true,
            message: summary.message.to_string(),
            count: summary.count,
            warnings: summary.warnings,
        }
    }
}

/// Format of the template download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TemplateFormat {
    /// Field description as JSON.
    #[default]
    Json,
    /// Header line plus example row.
    Csv,
}

/// Query of the template endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TemplateParams {
    /// `json` (default) or `csv`.
    #[serde(default)]
    pub format: TemplateFormat,
}

/// Pulls the row array stored under `key` out of an import body.
///
/// A missing key, a non-array value and an empty array all count as "no
/// data".
///
/// # Errors
///
/// - [`AdminError::EmptyImport`] when there are no rows.
/// - [`AdminError::InvalidRequest`] when an element is not a JSON object.
pub fn extract_rows(
    body: Value,
    key: &str,
    entity: &'static str,
) -> Result<Vec<RawRow>, AdminError> {
    let Value::Object(mut object) = body else {
        return Err(AdminError::EmptyImport(entity));
    };
    let Some(Value::Array(items)) = object.remove(key) else {
        return Err(AdminError::EmptyImport(entity));
    };
    if items.is_empty() {
        return Err(AdminError::EmptyImport(entity));
    }
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(RawRow::from(map)),
            _ => Err(AdminError::InvalidRequest(format!(
                "Row {} must be an object",
                index + 1
            ))),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_or_empty_arrays_are_empty_imports() {
        for body in [json!({}), json!({ "transactions": [] }), json!({ "transactions": "x" })] {
            let Err(err) = extract_rows(body, "transactions", "transaction") else {
                panic!("expected error");
            };
            assert_eq!(err.to_string(), "No transaction data provided");
        }
    }

    #[test]
    fn rows_are_flattened() {
        let body = json!({ "drives": [{ "title*": "Drive", "geolocation": { "latitude": 18.5 } }] });
        let Ok(rows) = extract_rows(body, "drives", "drive") else {
            panic!("rows expected");
        };
        let Some(row) = rows.first() else {
            panic!("one row");
        };
        assert_eq!(row.get("geolocation.latitude"), Some("18.5"));
    }

    #[test]
    fn scalar_rows_are_rejected() {
        let result = extract_rows(json!({ "drives": [1] }), "drives", "drive");
        assert!(matches!(result, Err(AdminError::InvalidRequest(_))));
    }

    #[test]
    fn warnings_are_omitted_when_empty() {
        let response = ImportResponse::from(ImportSummary {
            message: "Drives imported successfully",
            count: 2,
            warnings: Vec::new(),
        });
        let Ok(value) = serde_json::to_value(response) else {
            panic!("serializable");
        };
        assert_eq!(
            value,
            json!({ "success": true, "message": "Drives imported successfully", "count": 2 })
        );
    }
}
