//! Shared DTO types used across multiple endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::DateRange;
use crate::error::AdminError;
use crate::import::normalize::parse_date;
use crate::persistence::PageRequest;

/// Successful response carrying a payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DataResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Payload.
    pub data: T,
}

impl<T> DataResponse<T> {
    /// Wraps `data`.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Successful response carrying only a message.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Successful outcome with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 10.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Total number of matching items.
    pub total: u64,
    /// Current page number.
    pub page: u32,
    /// Total number of pages.
    pub total_pages: u64,
    /// Items per page.
    pub limit: u32,
}

impl PaginationMeta {
    /// Metadata for `total` items split into pages of `request.limit`.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        let limit = u64::from(request.limit.max(1));
        Self {
            total,
            page: request.page,
            total_pages: total.div_ceil(limit),
            limit: request.limit,
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PaginationParams {
    /// Clamps `page` to at least 1 and `limit` to 1..=100.
    #[must_use]
    pub fn clamped(&self) -> PageRequest {
        PageRequest {
            page: self.page.max(1),
            limit: self.limit.clamp(1, 100),
        }
    }
}

/// Parses a query date given as `DD-MM-YYYY` or `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns [`AdminError::InvalidRequest`] naming the parameter.
pub fn query_date(name: &str, value: &str) -> Result<NaiveDate, AdminError> {
    parse_date(value).ok_or_else(|| AdminError::InvalidRequest(format!("Invalid {name}: {value}")))
}

/// Inclusive range from optional bounds; a missing bound is open.
///
/// # Errors
///
/// Returns [`AdminError::InvalidRequest`] if a bound is not a date.
pub fn date_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, AdminError> {
    let from = start
        .filter(|s| !s.trim().is_empty())
        .map(|s| query_date("startDate", s))
        .transpose()?;
    let to = end
        .filter(|s| !s.trim().is_empty())
        .map(|s| query_date("endDate", s))
        .transpose()?;
    Ok(DateRange { from, to })
}

/// Treats empty query values as absent.
#[must_use]
pub fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn pagination_is_clamped() {
        let params = PaginationParams { page: 0, limit: 500 };
        assert_eq!(params.clamped(), PageRequest { page: 1, limit: 100 });
    }

    #[test]
    fn total_pages_rounds_up() {
        let meta = PaginationMeta::new(PageRequest { page: 1, limit: 10 }, 21);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(PaginationMeta::new(PageRequest { page: 1, limit: 10 }, 0).total_pages, 0);
    }

    #[test]
    fn date_range_accepts_both_formats_and_open_bounds() {
        let Ok(DateRange {
            from: Some(start),
            to: Some(end),
        }) = date_range(Some("01-01-2025"), Some("2025-01-31"))
        else {
            panic!("valid range");
        };
        assert_eq!(start.to_string(), "2025-01-01");
        assert_eq!(end.to_string(), "2025-01-31");

        let Ok(open) = date_range(None, Some("2025-01-31")) else {
            panic!("open range");
        };
        assert_eq!(open.from, None);
        assert_eq!(open.to.map(|d| d.to_string()), Some("2025-01-31".to_string()));
        assert!(matches!(date_range(None, Some("")), Ok(r) if r.is_unbounded()));
        assert!(date_range(Some("tomorrow"), None).is_err());
    }
}
