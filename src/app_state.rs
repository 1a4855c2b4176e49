//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::import::BatchImporter;
use crate::persistence::{FileStore, RecordStore};
use crate::service::{
    DriveService, ExpenditureService, ExportService, ImportService, TransactionService,
};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Bulk imports and templates.
    pub import_service: Arc<ImportService>,
    /// Single entry, listing and verification of transactions.
    pub transaction_service: Arc<TransactionService>,
    /// Drive listing and editing.
    pub drive_service: Arc<DriveService>,
    /// Expenditure bookkeeping.
    pub expenditure_service: Arc<ExpenditureService>,
    /// Admin dataset exports.
    pub export_service: Arc<ExportService>,
}

impl AppState {
    /// Wires every service to the same record store.
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        files: Arc<dyn FileStore>,
        importer: BatchImporter,
    ) -> Self {
        Self {
            import_service: Arc::new(ImportService::new(Arc::clone(&store), importer)),
            transaction_service: Arc::new(TransactionService::new(Arc::clone(&store), files)),
            drive_service: Arc::new(DriveService::new(Arc::clone(&store))),
            expenditure_service: Arc::new(ExpenditureService::new(Arc::clone(&store))),
            export_service: Arc::new(ExportService::new(store)),
        }
    }
}
