//! Bulk import pipeline.
//!
//! ```text
//! JSON array / CSV text
//!        │
//!        ▼
//!   [`RawRow`]s ──► [`validate_rows`] ──► [`ImportRecord::transform`] ──► [`BatchImporter`]
//!                    (all rows, all         (normalize, default,           (chunks of
//!                     violations)            derive)                        `batch_size`)
//! ```
//!
//! Nothing is written unless every row validates. Persistence happens in
//! independently committed batches; a failing batch aborts the import and
//! reports how many records earlier batches already committed.

pub mod batch_validator;
pub mod csv;
pub mod importer;
pub mod normalize;
pub mod raw_row;
pub mod records;
pub mod schema;
pub mod transform;
pub mod validators;

pub use batch_validator::{ValidationReport, validate_rows};
pub use importer::{BatchImporter, ImportOutcome};
pub use raw_row::RawRow;
pub use schema::{ImportSchema, ImportTemplate};
pub use transform::{DefaultedField, ImportRecord, TransformContext, Transformed};

/// Records written per persistence transaction.
pub const DEFAULT_BATCH_SIZE: usize = 100;
