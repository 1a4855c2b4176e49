//! # pasaydan-admin
//!
//! Admin backend for the Pasaydan donation platform.
//!
//! Administrators enter data in bulk (transactions, drives, certificates,
//! donation requests and expenditures) from spreadsheet rows, verify
//! incoming payments, track expenditures and export datasets. Every bulk
//! upload is validated as a whole before anything is stored, then written
//! in fixed-size batches.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── Services (service/)
//!     │     ├── ImportService ── validate → transform → BatchImporter (import/)
//!     │     ├── TransactionService / DriveService / ExpenditureService
//!     │     └── ExportService ── Table → JSON / CSV / XLSX (export/)
//!     │
//!     ├── RecordStore (persistence/)
//!     │     ├── PostgreSQL
//!     │     └── In-memory
//!     │
//!     └── FileStore (screenshots on local disk)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod import;
pub mod persistence;
pub mod service;
