//! Admin data export: drives, users and donation requests as JSON, CSV or
//! XLSX.

use std::str::FromStr;
use std::sync::Arc;

use crate::domain::{DateRange, DirectoryFilter, DriveFilter, DriveStatus};
use crate::error::AdminError;
use crate::export::{Table, donation_table, drive_table, user_table};
use crate::persistence::RecordStore;

/// Dataset selected by the `type` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// Donation drives.
    Drives,
    /// Registered users.
    Users,
    /// Donation requests.
    Donations,
}

impl DataKind {
    /// File stem of the download.
    #[must_use]
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Drives => "drives",
            Self::Users => "users",
            Self::Donations => "donations",
        }
    }
}

impl FromStr for DataKind {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drives" => Ok(Self::Drives),
            "users" => Ok(Self::Users),
            "donations" => Ok(Self::Donations),
            _ => Err(AdminError::InvalidRequest("Invalid data type".to_string())),
        }
    }
}

/// Filters shared by every dataset. Fields that do not apply to a dataset
/// are ignored.
#[derive(Debug, Clone, Default)]
pub struct ExportCriteria {
    /// Case-insensitive substring search.
    pub search: Option<String>,
    /// Status tag (drive status or request status).
    pub status: Option<String>,
    /// Drive category or donation type.
    pub category: Option<String>,
    /// Inclusive creation-date range.
    pub created_between: DateRange,
    /// Newest first when `true`.
    pub newest_first: bool,
}

/// Builds the admin export tables.
#[derive(Debug, Clone)]
pub struct ExportService {
    store: Arc<dyn RecordStore>,
}

impl ExportService {
    /// Creates a new `ExportService`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Collects the selected dataset as a table.
    ///
    /// # Errors
    ///
    /// - [`AdminError::InvalidRequest`] for an unknown drive status.
    /// - [`AdminError::Persistence`] on storage failure.
    pub async fn table(&self, kind: DataKind, criteria: &ExportCriteria) -> Result<Table, AdminError> {
        let table = match kind {
            DataKind::Drives => {
                let status = criteria
                    .status
                    .as_deref()
                    .map(DriveStatus::from_str)
                    .transpose()
                    .map_err(|e| AdminError::InvalidRequest(e.to_string()))?;
                let filter = DriveFilter {
                    search: criteria.search.clone(),
                    status,
                    dtype: criteria.category.clone(),
                    location: None,
                    created_between: criteria.created_between,
                };
                let mut drives = self.store.list_drives(&filter).await?;
                if !criteria.newest_first {
                    drives.reverse();
                }
                drive_table(&drives)
            }
            DataKind::Users => {
                let filter = DirectoryFilter {
                    search: criteria.search.clone(),
                    created_between: criteria.created_between,
                    ..DirectoryFilter::default()
                };
                let users = self.store.list_users(&filter, criteria.newest_first).await?;
                user_table(&users)
            }
            DataKind::Donations => {
                let filter = DirectoryFilter {
                    search: criteria.search.clone(),
                    status: criteria.status.clone(),
                    donation_type: criteria.category.clone(),
                    created_between: criteria.created_between,
                };
                let requests = self
                    .store
                    .list_donation_requests(&filter, criteria.newest_first)
                    .await?;
                donation_table(&requests)
            }
        };
        tracing::info!(dataset = kind.file_stem(), rows = table.rows.len(), "admin export built");
        Ok(table)
    }
}
