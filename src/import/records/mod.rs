//! [`ImportRecord`](super::ImportRecord) implementations, one per bulk
//! entry form.

mod certificate;
mod donation_request;
mod drive;
mod expenditure;
mod transaction;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::EnumToken;

use super::normalize::{normalize_enum, normalize_enum_or, parse_date};
use super::raw_row::RawRow;
use super::schema::ImportSchema;
use super::transform::DefaultedField;

/// Typed access to the cells of one validated row.
struct RowReader<'a> {
    schema: &'a ImportSchema,
    row: &'a RawRow,
    defaults: Vec<DefaultedField>,
}

impl<'a> RowReader<'a> {
    fn new(schema: &'a ImportSchema, row: &'a RawRow) -> Self {
        Self {
            schema,
            row,
            defaults: Vec::new(),
        }
    }

    fn opt(&self, field: &str) -> Option<String> {
        self.schema.value(self.row, field).map(ToString::to_string)
    }

    fn text(&self, field: &str) -> String {
        self.opt(field).unwrap_or_default()
    }

    fn amount(&self, field: &str) -> f64 {
        self.schema
            .value(self.row, field)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    fn date(&self, field: &str) -> Option<NaiveDate> {
        self.schema.value(self.row, field).and_then(parse_date)
    }

    fn date_or(&self, field: &str, fallback: DateTime<Utc>) -> NaiveDate {
        self.date(field).unwrap_or_else(|| fallback.date_naive())
    }

    /// Strictly validated enum; `fallback` only covers optional columns
    /// left empty.
    fn strict<E: EnumToken>(&self, field: &str, fallback: E) -> E {
        self.schema
            .value(self.row, field)
            .and_then(normalize_enum::<E>)
            .unwrap_or(fallback)
    }

    /// Forgiving enum: unrecognised input becomes `default` and is
    /// remembered for the import warnings.
    fn lenient<E: EnumToken>(&mut self, field: &'static str, default: E) -> E {
        let raw = self.schema.value(self.row, field);
        let normalized = normalize_enum_or(raw, default);
        if normalized.was_defaulted {
            self.defaults.push(DefaultedField {
                field,
                raw: raw.unwrap_or_default().to_string(),
                value: normalized.value.as_token(),
            });
        }
        normalized.value
    }

    fn into_defaults(self) -> Vec<DefaultedField> {
        self.defaults
    }
}
