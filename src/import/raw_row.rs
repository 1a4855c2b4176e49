//! String-keyed input rows as they arrive from a CSV file or a JSON body.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

/// One uploaded row: header spelling to cell text.
///
/// JSON rows are flattened on deserialization: numbers and booleans become
/// their text form, `null` cells are dropped, nested objects become dotted
/// keys (`{"geolocation": {"latitude": "18.5"}}` is stored under
/// `geolocation.latitude`) and arrays are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RawRow(BTreeMap<String, String>);

impl RawRow {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.0.insert(header.into(), value.into());
    }

    /// Raw cell lookup by exact header.
    #[must_use]
    pub fn get(&self, header: &str) -> Option<&str> {
        self.0.get(header).map(String::as_str)
    }

    /// Returns the trimmed value of the first alias that is present and
    /// non-empty.
    #[must_use]
    pub fn first_present<'a, I>(&self, aliases: I) -> Option<&str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        aliases.into_iter().find_map(|alias| {
            self.get(alias)
                .map(str::trim)
                .filter(|value| !value.is_empty())
        })
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the row has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn flatten_into(&mut self, prefix: Option<&str>, object: Map<String, Value>) {
        for (key, value) in object {
            let key = match prefix {
                Some(prefix) => format!("{prefix}.{key}"),
                None => key,
            };
            match value {
                Value::String(s) => self.insert(key, s),
                Value::Number(n) => self.insert(key, n.to_string()),
                Value::Bool(b) => self.insert(key, b.to_string()),
                Value::Object(nested) => self.flatten_into(Some(&key), nested),
                Value::Null | Value::Array(_) => {}
            }
        }
    }
}

impl From<Map<String, Value>> for RawRow {
    fn from(object: Map<String, Value>) -> Self {
        let mut row = Self::new();
        row.flatten_into(None, object);
        row
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn json_rows_are_flattened() {
        let json = serde_json::json!({
            "name*": "John Doe",
            "amount*": 1000,
            "verified": true,
            "note": null,
            "tags": ["a"],
            "geolocation": { "latitude": "18.52", "longitude": 73.85 }
        });
        let Ok(row) = serde_json::from_value::<RawRow>(json) else {
            panic!("row should deserialize");
        };
        assert_eq!(row.get("name*"), Some("John Doe"));
        assert_eq!(row.get("amount*"), Some("1000"));
        assert_eq!(row.get("verified"), Some("true"));
        assert_eq!(row.get("note"), None);
        assert_eq!(row.get("tags"), None);
        assert_eq!(row.get("geolocation.latitude"), Some("18.52"));
        assert_eq!(row.get("geolocation.longitude"), Some("73.85"));
    }

    #[test]
    fn first_present_skips_blank_cells() {
        let row: RawRow = [("date", "  "), ("date (DD-MM-YYYY)*", " 15-01-2025 ")]
            .into_iter()
            .collect();
        assert_eq!(
            row.first_present(["date", "date*", "date (DD-MM-YYYY)*"]),
            Some("15-01-2025")
        );
        assert_eq!(row.first_present(["missing"]), None);
    }
}
