//! Batch validator: checks every row of an upload and collects every
//! violation without stopping at the first one.

use std::collections::BTreeMap;

use serde::Serialize;

use super::raw_row::RawRow;
use super::transform::ImportRecord;

/// Violations per row, keyed by 0-based row index. Rows without problems
/// are absent; an empty report means the whole upload is valid.
///
/// Serializes as a JSON object: `{"1": ["Invalid email format"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport(BTreeMap<usize, Vec<String>>);

impl ValidationReport {
    /// Records one message for a row.
    pub fn push(&mut self, row: usize, message: String) {
        let messages = self.0.entry(row).or_default();
        if !messages.contains(&message) {
            messages.push(message);
        }
    }

    /// `true` when no row has a violation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of rows with at least one violation.
    #[must_use]
    pub fn invalid_rows(&self) -> usize {
        self.0.len()
    }

    /// Messages of one row.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.0.get(&index).map(Vec::as_slice)
    }

    /// Flat list tagged with 1-based row numbers: `Row 2: Invalid email format`.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(index, messages)| {
                messages
                    .iter()
                    .map(move |message| format!("Row {}: {message}", index + 1))
            })
            .collect()
    }
}

/// Validates every row against `R`'s schema and cross-field rules.
#[must_use]
pub fn validate_rows<R: ImportRecord>(rows: &[RawRow]) -> ValidationReport {
    let schema = R::schema();
    let mut report = ValidationReport::default();
    for (index, row) in rows.iter().enumerate() {
        for message in schema.check_row(row).into_iter().chain(R::cross_check(row)) {
            report.push(index, message);
        }
    }
    report
}
