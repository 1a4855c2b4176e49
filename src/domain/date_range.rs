//! Inclusive calendar-date range with optional bounds.

use chrono::NaiveDate;

/// Inclusive date range used by listing and export filters. Either bound
/// may be absent, in which case that side is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Earliest matching day.
    pub from: Option<NaiveDate>,
    /// Latest matching day.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Range between two inclusive bounds.
    #[must_use]
    pub const fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// `true` when neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns `true` if `day` lies within every present bound.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("valid date");
        };
        date
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = DateRange::between(day(2025, 1, 1), day(2025, 1, 31));
        assert!(range.contains(day(2025, 1, 1)));
        assert!(range.contains(day(2025, 1, 31)));
        assert!(!range.contains(day(2025, 2, 1)));
    }

    #[test]
    fn missing_bound_is_open() {
        let until = DateRange {
            from: None,
            to: Some(day(2025, 1, 31)),
        };
        assert!(until.contains(day(1990, 6, 1)));
        assert!(!until.contains(day(2025, 2, 1)));
        assert!(DateRange::default().is_unbounded());
        assert!(DateRange::default().contains(day(2025, 1, 1)));
    }
}
