//! Drive service: listing and editing donation drives.

use std::sync::Arc;

use crate::domain::{Drive, DriveFilter, DriveUpdate, RecordId};
use crate::error::AdminError;
use crate::persistence::RecordStore;

/// Drive administration. Drives are created through the bulk import.
#[derive(Debug, Clone)]
pub struct DriveService {
    store: Arc<dyn RecordStore>,
}

impl DriveService {
    /// Creates a new `DriveService`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Matching drives, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    pub async fn list(&self, filter: &DriveFilter) -> Result<Vec<Drive>, AdminError> {
        self.store.list_drives(filter).await
    }

    /// Fetches one drive.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] if the id is unknown.
    pub async fn get(&self, id: RecordId) -> Result<Drive, AdminError> {
        self.store
            .get_drive(id)
            .await?
            .ok_or_else(|| AdminError::not_found("drive", id))
    }

    /// Applies a partial update, re-checking the date range and coordinates.
    ///
    /// # Errors
    ///
    /// - [`AdminError::NotFound`] if the id is unknown.
    /// - [`AdminError::InvalidRequest`] if the end date precedes the start or
    ///   the coordinates are out of range.
    pub async fn update(&self, id: RecordId, update: DriveUpdate) -> Result<Drive, AdminError> {
        let mut drive = self.get(id).await?;
        drive
            .apply_update(update)
            .map_err(AdminError::InvalidRequest)?;
        self.store.save_drive(&drive).await?;
        tracing::info!(%id, status = %drive.status, "drive updated");
        Ok(drive)
    }

    /// Hard-deletes a drive.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] if the id is unknown.
    pub async fn delete(&self, id: RecordId) -> Result<(), AdminError> {
        if !self.store.delete_drive(id).await? {
            return Err(AdminError::not_found("drive", id));
        }
        tracing::info!(%id, "drive deleted");
        Ok(())
    }
}
