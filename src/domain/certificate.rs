//! Donation certificates issued to donors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RecordId;

/// A stored certificate entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Primary key.
    pub id: RecordId,
    /// Donation the certificate refers to.
    pub donation_id: String,
    /// Donor email.
    pub email: String,
    /// Certificate kind, e.g. `Food Donation`.
    #[serde(rename = "type")]
    pub certificate_type: String,
    /// Donor full name.
    pub fullname: String,
    /// 10-digit mobile number.
    pub mobile: String,
    /// Optional note.
    pub description: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A certificate ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCertificate {
    /// Donation reference.
    pub donation_id: String,
    /// Donor email.
    pub email: String,
    /// Certificate kind.
    #[serde(rename = "type")]
    pub certificate_type: String,
    /// Donor name.
    pub fullname: String,
    /// Mobile number.
    pub mobile: String,
    /// Optional note.
    pub description: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl NewCertificate {
    /// Attaches a primary key.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> Certificate {
        Certificate {
            id,
            donation_id: self.donation_id,
            email: self.email,
            certificate_type: self.certificate_type,
            fullname: self.fullname,
            mobile: self.mobile,
            description: self.description,
            created_at: self.created_at,
        }
    }
}
