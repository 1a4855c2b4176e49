//! Drive endpoint DTOs.

use serde::Deserialize;
use utoipa::IntoParams;

use super::common_dto::non_blank;
use crate::domain::{DateRange, DriveFilter, DriveStatus};
use crate::error::AdminError;

/// Drive listing filters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DriveFilterParams {
    /// `pending`, `active` or `completed`.
    pub status: Option<String>,
    /// Exact category.
    pub dtype: Option<String>,
    /// Exact venue.
    pub location: Option<String>,
    /// Case-insensitive match on title, location or category.
    pub search: Option<String>,
}

impl DriveFilterParams {
    /// Converts the query into a domain filter.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidRequest`] for an unknown status.
    pub fn to_filter(&self) -> Result<DriveFilter, AdminError> {
        let status = non_blank(self.status.as_ref())
            .map(|s| {
                s.to_lowercase()
                    .parse::<DriveStatus>()
                    .map_err(|e| AdminError::InvalidRequest(e.to_string()))
            })
            .transpose()?;
        Ok(DriveFilter {
            search: non_blank(self.search.as_ref()),
            status,
            dtype: non_blank(self.dtype.as_ref()),
            location: non_blank(self.location.as_ref()),
            created_between: DateRange::default(),
        })
    }
}
