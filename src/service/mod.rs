//! Service layer: business logic orchestration.
//!
//! Every service holds an `Arc<dyn RecordStore>`; handlers never touch
//! persistence directly. [`ImportService`] drives the bulk-import pipeline
//! for all entry forms, the others own one entity each.

pub mod drive_service;
pub mod expenditure_service;
pub mod export_service;
pub mod import_service;
pub mod transaction_service;

pub use drive_service::DriveService;
pub use expenditure_service::ExpenditureService;
pub use export_service::{DataKind, ExportCriteria, ExportService};
pub use import_service::{ImportService, ImportSummary};
pub use transaction_service::{TransactionPage, TransactionService, Upload};
