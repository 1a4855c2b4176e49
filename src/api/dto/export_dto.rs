//! Admin data export query.

use serde::Deserialize;
use utoipa::IntoParams;

use super::common_dto::{date_range, non_blank};
use crate::error::AdminError;
use crate::export::ExportFormat;
use crate::service::{DataKind, ExportCriteria};

/// Query of `GET /api/admin`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdminExportParams {
    /// `drives`, `users` or `donations`.
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    /// `json` (default), `csv` or `xlsx`.
    #[serde(default)]
    pub format: ExportFormat,
    /// Case-insensitive substring search.
    pub search: Option<String>,
    /// Drive status or donation request status.
    pub status: Option<String>,
    /// Drive category or donation type.
    pub category: Option<String>,
    /// Inclusive lower creation-date bound.
    pub start_date: Option<String>,
    /// Inclusive upper creation-date bound.
    pub end_date: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_order: Option<String>,
}

impl AdminExportParams {
    /// Selected dataset.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidRequest`] (`Invalid data type`) when the
    /// type is missing or unknown.
    pub fn kind(&self) -> Result<DataKind, AdminError> {
        self.data_type.as_deref().unwrap_or_default().parse()
    }

    /// Service-level criteria.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidRequest`] for a malformed date.
    pub fn criteria(&self) -> Result<ExportCriteria, AdminError> {
        Ok(ExportCriteria {
            search: non_blank(self.search.as_ref()),
            status: non_blank(self.status.as_ref()).filter(|s| !s.eq_ignore_ascii_case("all")),
            category: non_blank(self.category.as_ref()).filter(|s| !s.eq_ignore_ascii_case("all")),
            created_between: date_range(self.start_date.as_deref(), self.end_date.as_deref())?,
            newest_first: !self
                .sort_order
                .as_deref()
                .is_some_and(|o| o.eq_ignore_ascii_case("asc")),
        })
    }
}
