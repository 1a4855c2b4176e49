//! CSV upload parsing.

use super::raw_row::RawRow;
use crate::error::AdminError;

/// Parses CSV text into raw rows keyed by header.
///
/// A UTF-8 byte-order mark is ignored, headers are trimmed, and empty cells
/// are left out of the row so they read as missing. A record made only of
/// delimiters stays in place as an empty row so later rows keep their
/// position; such records are dropped only at the end of the file. Blank
/// lines are skipped.
///
/// # Errors
///
/// Returns [`AdminError::MalformedCsv`] if the text has no header line or a
/// record cannot be decoded.
pub fn parse_csv(text: &str) -> Result<Vec<RawRow>, AdminError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ::csv::ReaderBuilder::new()
        .flexible(true)
        .trim(::csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AdminError::MalformedCsv(e.to_string()))?
        .clone();
    if headers.iter().all(str::is_empty) {
        return Err(AdminError::MalformedCsv("missing header row".to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AdminError::MalformedCsv(e.to_string()))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, cell)| !header.is_empty() && !cell.trim().is_empty())
            .collect();
        rows.push(row);
    }
    while rows.last().is_some_and(RawRow::is_empty) {
        rows.pop();
    }
    Ok(rows)
}
