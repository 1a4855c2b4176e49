//! Field validators.
//!
//! Pure predicates over a single cell value. They only answer yes or no;
//! the schema layer turns a `false` into a user-facing message.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::domain::EnumToken;

use super::normalize::normalize_enum;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

static PHONE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\+?[\d\s-]{10,}$").ok());

static MOBILE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d{10}$").ok());

static DAY_FIRST: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(0?[1-9]|[12][0-9]|3[01])-(0?[1-9]|1[012])-(\d{4})$").ok()
});

static YEAR_FIRST: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").ok());

static DECIMAL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]{1,3}(\.[0-9]+)?$").ok());

fn matches(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

/// Removes a template format hint such as ` (DD-MM-YYYY)*` from a value
/// pasted together with its header annotation.
#[must_use]
pub fn strip_format_hint(value: &str) -> &str {
    let trimmed = value.trim();
    let without_star = trimmed.strip_suffix('*').unwrap_or(trimmed).trim_end();
    without_star
        .strip_suffix("(DD-MM-YYYY)")
        .map_or(trimmed, str::trim_end)
}

/// Splits a date into `(year, month, day)` if it has the `DD-MM-YYYY` or
/// `YYYY-MM-DD` shape. Calendar validity is not checked.
pub(crate) fn date_parts(value: &str) -> Option<(i32, u32, u32)> {
    let clean = strip_format_hint(value);
    let day_first = DAY_FIRST.as_ref().and_then(|re| re.captures(clean));
    if let Some(caps) = day_first {
        let day = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2)?.as_str().parse().ok()?;
        let year = caps.get(3)?.as_str().parse().ok()?;
        return Some((year, month, day));
    }
    let caps = YEAR_FIRST.as_ref().and_then(|re| re.captures(clean))?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    let day = caps.get(3)?.as_str().parse().ok()?;
    Some((year, month, day))
}

/// `true` for a real calendar date written as `DD-MM-YYYY` (one or two
/// digit day and month) or `YYYY-MM-DD`, after stripping a format hint.
///
/// `31-02-2025` is rejected; `29-02-2024` is accepted.
#[must_use]
pub fn is_valid_date(value: &str) -> bool {
    date_parts(value).is_some_and(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).is_some())
}

/// `true` for a `local@domain.tld` shaped address.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    matches(&EMAIL, value.trim())
}

/// `true` for an optional `+` followed by at least ten digits, spaces or
/// hyphens.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    matches(&PHONE, value.trim())
}

/// `true` for exactly ten digits.
#[must_use]
pub fn is_valid_mobile(value: &str) -> bool {
    matches(&MOBILE, value.trim())
}

/// Parses a plain decimal coordinate. Exponents, `inf` and `NaN` are
/// rejected by shape before parsing.
fn coordinate(value: &str) -> Option<f64> {
    let value = value.trim();
    if !matches(&DECIMAL, value) {
        return None;
    }
    value.parse().ok()
}

/// `true` for a finite latitude in `[-90, 90]`.
#[must_use]
pub fn latitude_in_range(degrees: f64) -> bool {
    degrees.is_finite() && (-90.0..=90.0).contains(&degrees)
}

/// `true` for a finite longitude in `[-180, 180]`.
#[must_use]
pub fn longitude_in_range(degrees: f64) -> bool {
    degrees.is_finite() && (-180.0..=180.0).contains(&degrees)
}

/// `true` for a decimal latitude in `[-90, 90]`.
#[must_use]
pub fn is_valid_latitude(value: &str) -> bool {
    coordinate(value).is_some_and(latitude_in_range)
}

/// `true` for a decimal longitude in `[-180, 180]`.
#[must_use]
pub fn is_valid_longitude(value: &str) -> bool {
    coordinate(value).is_some_and(longitude_in_range)
}

/// `true` for a finite number greater than zero.
#[must_use]
pub fn is_positive_amount(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .is_ok_and(|amount| amount.is_finite() && amount > 0.0)
}

/// `true` if the value names a variant of `E` once normalized.
#[must_use]
pub fn is_enum_member<E: EnumToken>(value: &str) -> bool {
    normalize_enum::<E>(value).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DriveStatus, UserType};

    #[test]
    fn calendar_validity() {
        assert!(!is_valid_date("31-02-2025"));
        assert!(is_valid_date("29-02-2024"));
        assert!(!is_valid_date("29-02-2023"));
        assert!(is_valid_date("1-1-2025"));
        assert!(is_valid_date("2025-01-15"));
        assert!(!is_valid_date("2025-1-15"));
        assert!(!is_valid_date("15/01/2025"));
        assert!(!is_valid_date("15-01-25"));
    }

    #[test]
    fn date_hint_is_ignored() {
        assert!(is_valid_date("15-01-2025 (DD-MM-YYYY)*"));
        assert!(is_valid_date("15-01-2025 (DD-MM-YYYY)"));
        assert_eq!(strip_format_hint(" 15-01-2025 (DD-MM-YYYY)* "), "15-01-2025");
        assert_eq!(strip_format_hint("15-01-2025"), "15-01-2025");
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("john@example.com"));
        assert!(!is_valid_email("john@example"));
        assert!(!is_valid_email("john doe@example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn phone_is_lenient_and_mobile_is_strict() {
        assert!(is_valid_phone("+91 9876543210"));
        assert!(is_valid_phone("98765-43210"));
        assert!(!is_valid_phone("12345"));
        assert!(is_valid_mobile("9876543210"));
        assert!(!is_valid_mobile("+91 9876543210"));
        assert!(!is_valid_mobile("98765432101"));
    }

    #[test]
    fn coordinates() {
        assert!(is_valid_latitude("18.5204"));
        assert!(is_valid_latitude("-90"));
        assert!(!is_valid_latitude("91"));
        assert!(is_valid_longitude("73.8567"));
        assert!(is_valid_longitude("-180"));
        assert!(!is_valid_longitude("181.5"));
    }

    #[test]
    fn coordinate_limits_are_exact() {
        assert!(is_valid_latitude("90"));
        assert!(is_valid_latitude("-90.0"));
        assert!(!is_valid_latitude("90.5"));
        assert!(!is_valid_latitude("-90.1"));
        assert!(!is_valid_latitude("90.0001"));
        assert!(is_valid_longitude("180"));
        assert!(is_valid_longitude("-180.000"));
        assert!(!is_valid_longitude("180.9"));
        assert!(!is_valid_longitude("-180.01"));
        assert!(!is_valid_latitude("1e1"));
        assert!(!is_valid_longitude("NaN"));
        assert!(!latitude_in_range(f64::INFINITY));
    }

    #[test]
    fn amounts() {
        assert!(is_positive_amount("1000"));
        assert!(is_positive_amount(" 12.50 "));
        assert!(!is_positive_amount("0"));
        assert!(!is_positive_amount("-5"));
        assert!(!is_positive_amount("ten"));
        assert!(!is_positive_amount("NaN"));
    }

    #[test]
    fn enum_membership_after_normalization() {
        assert!(is_enum_member::<UserType>("INDIVIDUAL"));
        assert!(is_enum_member::<UserType>("organisation"));
        assert!(!is_enum_member::<UserType>("TRUST"));
        assert!(is_enum_member::<DriveStatus>("Active"));
    }
}
