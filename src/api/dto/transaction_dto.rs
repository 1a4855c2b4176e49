//! Transaction endpoint DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, date_range, non_blank};
use crate::domain::{Transaction, TransactionFilter, TransactionStatus};
use crate::error::AdminError;
use crate::export::ExportFormat;

/// Filter query shared by listing, stats and export.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TransactionFilterParams {
    /// Case-insensitive match on name, email or transaction id.
    pub search: Option<String>,
    /// `PENDING`, `VERIFIED` or `REJECTED`.
    pub status: Option<String>,
    /// Inclusive lower value-date bound.
    pub start_date: Option<String>,
    /// Inclusive upper value-date bound.
    pub end_date: Option<String>,
}

impl TransactionFilterParams {
    /// Converts the query into a domain filter. `status=all` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidRequest`] for an unknown status or a
    /// malformed date.
    pub fn to_filter(&self) -> Result<TransactionFilter, AdminError> {
        let status = non_blank(self.status.as_ref())
            .filter(|s| !s.eq_ignore_ascii_case("all"))
            .map(|s| {
                s.to_uppercase()
                    .parse::<TransactionStatus>()
                    .map_err(|e| AdminError::InvalidRequest(e.to_string()))
            })
            .transpose()?;
        Ok(TransactionFilter {
            search: non_blank(self.search.as_ref()),
            status,
            date_range: date_range(self.start_date.as_deref(), self.end_date.as_deref())?,
        })
    }
}

/// Paginated transaction listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionListResponse {
    /// Always `true`.
    pub success: bool,
    /// Transactions on this page.
    pub data: Vec<Transaction>,
    /// Page metadata.
    pub pagination: PaginationMeta,
}

/// Body of the verify action.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Admin confirming the payment.
    pub verified_by: String,
}

/// Body of the reject action.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    /// Reason shown to other admins.
    #[serde(default)]
    pub status_description: Option<String>,
}

/// Query of the export endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionExportParams {
    /// `csv` (default) or `xlsx`.
    #[serde(default = "default_export_format")]
    pub format: ExportFormat,
}

fn default_export_format() -> ExportFormat {
    ExportFormat::Csv
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn status_is_case_insensitive_and_all_means_any() {
        let params = TransactionFilterParams {
            status: Some("verified".to_string()),
            ..TransactionFilterParams::default()
        };
        let Ok(filter) = params.to_filter() else {
            panic!("valid filter");
        };
        assert_eq!(filter.status, Some(TransactionStatus::Verified));

        let params = TransactionFilterParams {
            status: Some("all".to_string()),
            ..TransactionFilterParams::default()
        };
        assert!(matches!(params.to_filter(), Ok(TransactionFilter { status: None, .. })));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let params = TransactionFilterParams {
            status: Some("LOST".to_string()),
            ..TransactionFilterParams::default()
        };
        assert!(matches!(params.to_filter(), Err(AdminError::InvalidRequest(_))));
    }
}
