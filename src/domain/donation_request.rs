//! In-kind donation requests and the registered-user directory used by the
//! admin export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{DateRange, RecordId};

/// Status given to every imported donation request.
pub const INITIAL_REQUEST_STATUS: &str = "Pending";

/// A stored donation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    /// Primary key.
    pub id: RecordId,
    /// Donor full name.
    pub fullname: String,
    /// Donor phone.
    pub mobile: String,
    /// Donor email, lower-cased.
    pub email: String,
    /// Pick-up address.
    pub address: String,
    /// What is being donated.
    #[serde(rename = "type")]
    pub donation_type: String,
    /// Free-text quantity.
    pub quantity: String,
    /// Review status (`Pending` on import).
    pub status: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A donation request ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDonationRequest {
    /// Donor name.
    pub fullname: String,
    /// Donor phone.
    pub mobile: String,
    /// Lower-cased email.
    pub email: String,
    /// Pick-up address.
    pub address: String,
    /// What is being donated.
    #[serde(rename = "type")]
    pub donation_type: String,
    /// Quantity.
    pub quantity: String,
    /// Review status.
    pub status: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl NewDonationRequest {
    /// Attaches a primary key.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> DonationRequest {
        DonationRequest {
            id,
            fullname: self.fullname,
            mobile: self.mobile,
            email: self.email,
            address: self.address,
            donation_type: self.donation_type,
            quantity: self.quantity,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Read model of a registered user, as exported by the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Primary key.
    pub id: RecordId,
    /// Full name.
    pub fullname: String,
    /// Email.
    pub email: String,
    /// Postal address.
    pub address: Option<String>,
    /// Mobile number.
    pub mobile: Option<String>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Shared criteria of the admin export for requests and users.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryFilter {
    /// Case-insensitive substring of name, email and a third column
    /// (mobile for users, type for requests).
    pub search: Option<String>,
    /// Exact status (requests only).
    pub status: Option<String>,
    /// Exact donation type (requests only).
    pub donation_type: Option<String>,
    /// Inclusive creation-date range.
    pub created_between: DateRange,
}

impl DirectoryFilter {
    fn search_hits(&self, fields: [&str; 3]) -> bool {
        self.search.as_ref().is_none_or(|search| {
            let needle = search.to_lowercase();
            fields.iter().any(|f| f.to_lowercase().contains(&needle))
        })
    }

    fn in_range(&self, created_at: DateTime<Utc>) -> bool {
        self.created_between.contains(created_at.date_naive())
    }

    /// Returns `true` if the request satisfies every criterion.
    #[must_use]
    pub fn matches_request(&self, req: &DonationRequest) -> bool {
        self.search_hits([&req.fullname, &req.email, &req.donation_type])
            && self.status.as_ref().is_none_or(|s| *s == req.status)
            && self
                .donation_type
                .as_ref()
                .is_none_or(|t| *t == req.donation_type)
            && self.in_range(req.created_at)
    }

    /// Returns `true` if the user satisfies the search and date criteria.
    #[must_use]
    pub fn matches_user(&self, user: &UserSummary) -> bool {
        self.search_hits([
            &user.fullname,
            &user.email,
            user.mobile.as_deref().unwrap_or_default(),
        ]) && self.in_range(user.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DonationRequest {
        DonationRequest {
            id: RecordId::new(),
            fullname: "Ravi Kulkarni".to_string(),
            mobile: "9876543210".to_string(),
            email: "ravi@example.com".to_string(),
            address: "Kothrud, Pune".to_string(),
            donation_type: "Books".to_string(),
            quantity: "20".to_string(),
            status: INITIAL_REQUEST_STATUS.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn search_covers_type_column() {
        let filter = DirectoryFilter {
            search: Some("book".to_string()),
            ..DirectoryFilter::default()
        };
        assert!(filter.matches_request(&request()));
    }

    #[test]
    fn status_must_match_exactly() {
        let filter = DirectoryFilter {
            status: Some("Approved".to_string()),
            ..DirectoryFilter::default()
        };
        assert!(!filter.matches_request(&request()));
    }
}
