//! Record transformer contract.
//!
//! Every importable entity implements [`ImportRecord`]: it names its schema
//! and maps a raw row, already checked by the batch validator, onto the
//! typed record handed to persistence.

use chrono::{DateTime, Utc};

use super::raw_row::RawRow;
use super::schema::ImportSchema;

/// Request-scoped inputs of a transform.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext {
    /// Timestamp stamped on `entryAt`/`createdAt`.
    pub now: DateTime<Utc>,
}

impl TransformContext {
    /// Context stamped with the current time.
    #[must_use]
    pub fn now() -> Self {
        Self { now: Utc::now() }
    }
}

/// A field whose value came from the forgiving-import default rather than
/// the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultedField {
    /// Logical field name.
    pub field: &'static str,
    /// Cell text as uploaded (empty if the cell was missing).
    pub raw: String,
    /// Token that was injected.
    pub value: &'static str,
}

/// Output of a transform: the record plus any injected defaults.
#[derive(Debug, Clone)]
pub struct Transformed<T> {
    /// Record ready for persistence.
    pub record: T,
    /// Defaults injected while normalizing enum columns.
    pub defaults: Vec<DefaultedField>,
}

impl<T> Transformed<T> {
    /// A transform that injected nothing.
    #[must_use]
    pub fn clean(record: T) -> Self {
        Self {
            record,
            defaults: Vec::new(),
        }
    }
}

/// An entity that can be bulk-imported from raw rows.
pub trait ImportRecord: Sized + Send + Sync + 'static {
    /// Singular name used in messages (`No transaction data provided`).
    const ENTITY: &'static str;

    /// Message returned after a successful import.
    const SUCCESS_MESSAGE: &'static str;

    /// Field list of the import form.
    fn schema() -> &'static ImportSchema;

    /// Rules spanning several fields. Runs after the per-field checks.
    fn cross_check(_row: &RawRow) -> Vec<String> {
        Vec::new()
    }

    /// Maps a validated row onto the typed record. Must not fail: the
    /// batch validator has already rejected anything unusable.
    fn transform(row: &RawRow, ctx: &TransformContext) -> Transformed<Self>;
}
