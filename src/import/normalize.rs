//! Format normalizer: locale dates to `YYYY-MM-DD`, free-text enum input
//! to canonical tokens.

use chrono::NaiveDate;

use crate::domain::EnumToken;

use super::validators::strip_format_hint;

/// Converts `DD-MM-YYYY` to `YYYY-MM-DD` with zero padding.
///
/// A value already in `YYYY-MM-DD` shape is returned without its format
/// hint. Anything that does not split into three parts is returned
/// unchanged. No calendar validation happens here, so the result is only
/// meaningful for input that passed [`is_valid_date`](super::validators::is_valid_date).
#[must_use]
pub fn convert_to_yyyymmdd(value: &str) -> String {
    let clean = strip_format_hint(value);
    let parts: Vec<&str> = clean.split('-').collect();
    let [first, second, third] = parts.as_slice() else {
        return value.to_string();
    };
    if first.len() == 4 {
        return clean.to_string();
    }
    format!("{third}-{second:0>2}-{first:0>2}")
}

/// Parses a validated `DD-MM-YYYY` or `YYYY-MM-DD` cell.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&convert_to_yyyymmdd(value), "%Y-%m-%d").ok()
}

/// Upper-cases and replaces spaces and hyphens with underscores, so that
/// `"net banking"` and `"Net-Banking"` both become `NET_BANKING`.
#[must_use]
pub fn canonical_token(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Maps free-form input onto a variant of `E`.
///
/// Tries an exact token match first, then a case-insensitive match on the
/// canonical spelling, then the enum's synonym table.
#[must_use]
pub fn normalize_enum<E: EnumToken>(raw: &str) -> Option<E> {
    let trimmed = raw.trim();
    if let Some(value) = E::from_token(trimmed) {
        return Some(value);
    }
    let canonical = canonical_token(trimmed);
    if canonical.is_empty() {
        return None;
    }
    let by_token = E::TOKENS
        .iter()
        .find(|token| token.eq_ignore_ascii_case(&canonical))
        .and_then(|token| E::from_token(token));
    by_token.or_else(|| {
        E::SYNONYMS
            .iter()
            .find(|(spelling, _)| *spelling == canonical)
            .and_then(|(_, target)| E::from_token(target))
    })
}

/// A normalized enum value, flagged when the forgiving-import default was
/// injected instead of a recognised value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized<E> {
    /// Resulting value.
    pub value: E,
    /// `true` if the input was not recognised and `value` is the default.
    pub was_defaulted: bool,
}

/// Like [`normalize_enum`], but falls back to `default` for unrecognised or
/// missing input and records that it did so.
#[must_use]
pub fn normalize_enum_or<E: EnumToken>(raw: Option<&str>, default: E) -> Normalized<E> {
    match raw.and_then(normalize_enum::<E>) {
        Some(value) => Normalized {
            value,
            was_defaulted: false,
        },
        None => Normalized {
            value: default,
            was_defaulted: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DriveStatus, MoneyFor, TransactionType};

    #[test]
    fn day_first_is_reordered_and_padded() {
        assert_eq!(convert_to_yyyymmdd("5-1-2025"), "2025-01-05");
        assert_eq!(convert_to_yyyymmdd("15-01-2025 (DD-MM-YYYY)*"), "2025-01-15");
    }

    #[test]
    fn conversion_is_idempotent() {
        for input in ["15-01-2025", "1-2-2024", "2025-03-09", "29-02-2024"] {
            let once = convert_to_yyyymmdd(input);
            assert_eq!(convert_to_yyyymmdd(&once), once, "input {input}");
        }
    }

    #[test]
    fn malformed_input_is_returned_unchanged() {
        assert_eq!(convert_to_yyyymmdd("15/01/2025"), "15/01/2025");
        assert_eq!(convert_to_yyyymmdd("yesterday"), "yesterday");
    }

    #[test]
    fn invalid_dates_do_not_parse() {
        // Reordered but still not a real day.
        assert_eq!(convert_to_yyyymmdd("31-02-2025"), "2025-02-31");
        assert!(parse_date("31-02-2025").is_none());
        assert!(parse_date("15-01-2025").is_some());
    }

    #[test]
    fn enum_lookup_order() {
        assert_eq!(normalize_enum::<TransactionType>("UPI"), Some(TransactionType::Upi));
        assert_eq!(normalize_enum::<TransactionType>("upi"), Some(TransactionType::Upi));
        assert_eq!(
            normalize_enum::<TransactionType>("net banking"),
            Some(TransactionType::NetBanking)
        );
        assert_eq!(normalize_enum::<TransactionType>("neft"), Some(TransactionType::NetBanking));
        assert_eq!(normalize_enum::<DriveStatus>("ACTIVE"), Some(DriveStatus::Active));
        assert_eq!(normalize_enum::<TransactionType>(""), None);
    }

    #[test]
    fn defaults_are_flagged() {
        let cash = normalize_enum_or(Some("cheque"), TransactionType::Cash);
        assert_eq!(cash.value, TransactionType::Cash);
        assert!(cash.was_defaulted);

        let other = normalize_enum_or(None, MoneyFor::Other);
        assert!(other.was_defaulted);

        let food = normalize_enum_or(Some("food"), MoneyFor::Other);
        assert_eq!(food.value, MoneyFor::Food);
        assert!(!food.was_defaulted);
    }
}
