//! Tabular exports: CSV (UTF-8 BOM), XLSX and JSON.
//!
//! Every export is first built as a [`Table`] of display strings, then
//! rendered in the requested [`ExportFormat`].

pub mod tables;
mod writers;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::AdminError;

pub use tables::{donation_table, drive_table, transaction_table, user_table};

/// Output format of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// JSON array of objects keyed by column.
    #[default]
    Json,
    /// Comma-separated values with a UTF-8 byte-order mark.
    Csv,
    /// Excel workbook.
    Xlsx,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    /// MIME type of the rendered file.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv; charset=utf-8",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

/// Rows of display strings under a fixed header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Worksheet name.
    pub name: String,
    /// Column titles.
    pub headers: Vec<String>,
    /// Cell text, one `Vec` per row, aligned with `headers`.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Empty table with the given column titles.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Renders the table.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Export`] if the writer fails.
    pub fn render(&self, format: ExportFormat) -> Result<Vec<u8>, AdminError> {
        match format {
            ExportFormat::Csv => writers::to_csv(self),
            ExportFormat::Xlsx => writers::to_xlsx(self),
            ExportFormat::Json => serde_json::to_vec(&writers::to_json(self))
                .map_err(|e| AdminError::Export(e.to_string())),
        }
    }

    /// Renders the table as a downloadable file named `<stem>.<ext>`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Export`] if the writer fails.
    pub fn into_file(self, stem: &str, format: ExportFormat) -> Result<ExportFile, AdminError> {
        let bytes = self.render(format)?;
        Ok(ExportFile {
            file_name: format!("{stem}.{}", format.extension()),
            format,
            bytes,
        })
    }

    /// JSON array of objects keyed by column title.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        writers::to_json(self)
    }
}

/// A rendered export served as an attachment.
#[derive(Debug, Clone)]
pub struct ExportFile {
    /// Download name.
    pub file_name: String,
    /// Format of `bytes`.
    pub format: ExportFormat,
    /// File content.
    pub bytes: Vec<u8>,
}

impl IntoResponse for ExportFile {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name);
        (
            [
                (header::CONTENT_TYPE, self.format.content_type().to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn table() -> Table {
        let mut t = Table::new("Drives", ["id", "title"]);
        t.push_row(vec!["1".to_string(), "Food, clothes".to_string()]);
        t
    }

    #[test]
    fn file_name_carries_extension() {
        let Ok(file) = table().into_file("drives", ExportFormat::Csv) else {
            panic!("csv export");
        };
        assert_eq!(file.file_name, "drives.csv");
    }

    #[test]
    fn format_deserializes_lowercase() {
        let Ok(format) = serde_json::from_str::<ExportFormat>("\"xlsx\"") else {
            panic!("format must parse");
        };
        assert_eq!(format, ExportFormat::Xlsx);
        assert!(serde_json::from_str::<ExportFormat>("\"pdf\"").is_err());
    }

    #[test]
    fn response_sets_attachment_headers() {
        let Ok(file) = table().into_file("drives", ExportFormat::Csv) else {
            panic!("csv export");
        };
        let response = file.into_response();
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok());
        assert_eq!(disposition, Some("attachment; filename=\"drives.csv\""));
    }
}
