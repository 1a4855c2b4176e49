//! Expenditure endpoint DTOs.

use serde::Deserialize;
use utoipa::IntoParams;

use super::common_dto::{non_blank, query_date};
use crate::domain::{ExpenditureCategory, ExpenditureFilter};
use crate::error::AdminError;
use crate::import::normalize::normalize_enum;

/// Listing and stats filters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExpenditureFilterParams {
    /// `CYCLE`, `ASHRAM`, `STUDENT` or `OTHER`.
    pub category: Option<String>,
    /// Inclusive lower date bound.
    pub start_date: Option<String>,
    /// Inclusive upper date bound.
    pub end_date: Option<String>,
    /// Beneficiary id.
    pub user_id: Option<String>,
}

impl ExpenditureFilterParams {
    /// Converts the query into a domain filter.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidRequest`] for an unknown category or a
    /// malformed date.
    pub fn to_filter(&self) -> Result<ExpenditureFilter, AdminError> {
        let category = non_blank(self.category.as_ref())
            .map(|c| {
                normalize_enum::<ExpenditureCategory>(&c)
                    .ok_or_else(|| AdminError::InvalidRequest(format!("Invalid category: {c}")))
            })
            .transpose()?;
        let start_date = non_blank(self.start_date.as_ref())
            .map(|d| query_date("startDate", &d))
            .transpose()?;
        let end_date = non_blank(self.end_date.as_ref())
            .map(|d| query_date("endDate", &d))
            .transpose()?;
        Ok(ExpenditureFilter {
            category,
            start_date,
            end_date,
            user_id: non_blank(self.user_id.as_ref()),
        })
    }
}
