//! Expenditures: money spent by the NGO.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RecordId;
use super::enums::ExpenditureCategory;

/// A stored expenditure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expenditure {
    /// Primary key.
    pub id: RecordId,
    /// Positive amount.
    pub amount: f64,
    /// Spending date.
    pub date: NaiveDate,
    /// Free-text note.
    pub description: Option<String>,
    /// Spending category.
    pub category: ExpenditureCategory,
    /// Present iff `category` is OTHER.
    pub custom_category: Option<String>,
    /// Who entered the record.
    pub entry_by: String,
    /// Beneficiary user, if any.
    pub user_id: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// An expenditure ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewExpenditure {
    /// Positive amount.
    pub amount: f64,
    /// Spending date.
    pub date: NaiveDate,
    /// Free-text note.
    pub description: Option<String>,
    /// Spending category.
    pub category: ExpenditureCategory,
    /// Present iff OTHER.
    pub custom_category: Option<String>,
    /// Who entered the record.
    pub entry_by: String,
    /// Beneficiary user.
    pub user_id: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl NewExpenditure {
    /// Checks the record invariants, returning every violation.
    #[must_use]
    pub fn violations(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.amount.is_finite() && self.amount > 0.0) {
            errors.push("Amount must be a positive number".to_string());
        }
        if self.entry_by.trim().is_empty() {
            errors.push("Entry by is required".to_string());
        }
        errors.extend(category_violation(self.category, self.custom_category.as_deref()));
        errors
    }

    /// Attaches a primary key.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> Expenditure {
        Expenditure {
            id,
            amount: self.amount,
            date: self.date,
            description: self.description,
            category: self.category,
            custom_category: self.custom_category,
            entry_by: self.entry_by,
            user_id: self.user_id,
            created_at: self.created_at,
        }
    }
}

/// `customCategory` must be present iff the category is OTHER.
#[must_use]
pub fn category_violation(category: ExpenditureCategory, custom: Option<&str>) -> Option<String> {
    let has_custom = custom.is_some_and(|c| !c.trim().is_empty());
    match (category, has_custom) {
        (ExpenditureCategory::Other, false) => {
            Some("Custom category is required when category is OTHER".to_string())
        }
        _ => None,
    }
}

/// Partial update of an expenditure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenditureUpdate {
    /// New amount.
    pub amount: Option<f64>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New note.
    pub description: Option<String>,
    /// New category.
    pub category: Option<ExpenditureCategory>,
    /// New custom category.
    pub custom_category: Option<String>,
    /// New beneficiary; `"none"` or empty unlinks.
    pub user_id: Option<String>,
}

impl Expenditure {
    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns every violated invariant; the record is left unchanged.
    pub fn apply_update(&mut self, update: ExpenditureUpdate) -> Result<(), Vec<String>> {
        let mut next = self.clone();
        if let Some(amount) = update.amount {
            next.amount = amount;
        }
        if let Some(date) = update.date {
            next.date = date;
        }
        if let Some(description) = update.description {
            next.description = Some(description.trim().to_string()).filter(|d| !d.is_empty());
        }
        if let Some(category) = update.category {
            next.category = category;
        }
        if update.custom_category.is_some() {
            next.custom_category = update
                .custom_category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty());
        }
        if next.category != ExpenditureCategory::Other {
            next.custom_category = None;
        }
        if let Some(user_id) = update.user_id {
            next.user_id = normalize_user_link(&user_id);
        }

        let mut errors = Vec::new();
        if !(next.amount.is_finite() && next.amount > 0.0) {
            errors.push("Amount must be a positive number".to_string());
        }
        errors.extend(category_violation(next.category, next.custom_category.as_deref()));
        if !errors.is_empty() {
            return Err(errors);
        }
        *self = next;
        Ok(())
    }
}

/// The entry form sends `"none"` for "no beneficiary".
#[must_use]
pub fn normalize_user_link(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Search criteria for expenditure listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenditureFilter {
    /// Exact category.
    pub category: Option<ExpenditureCategory>,
    /// Inclusive lower date bound.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub end_date: Option<NaiveDate>,
    /// Exact beneficiary.
    pub user_id: Option<String>,
}

impl ExpenditureFilter {
    /// Returns `true` if the expenditure satisfies every criterion.
    #[must_use]
    pub fn matches(&self, exp: &Expenditure) -> bool {
        self.category.is_none_or(|c| c == exp.category)
            && self.start_date.is_none_or(|d| exp.date >= d)
            && self.end_date.is_none_or(|d| exp.date <= d)
            && self
                .user_id
                .as_ref()
                .is_none_or(|u| exp.user_id.as_ref() == Some(u))
    }
}

/// Totals for the expenditures dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenditureStats {
    /// Sum of all amounts.
    pub total_amount: f64,
    /// Number of expenditures.
    pub total_count: u64,
    /// Sum per category token.
    pub by_category: BTreeMap<String, f64>,
}

impl ExpenditureStats {
    /// Folds one expenditure into the totals.
    pub fn record(&mut self, exp: &Expenditure) {
        self.total_amount += exp.amount;
        self.total_count += 1;
        *self
            .by_category
            .entry(exp.category.as_str().to_string())
            .or_insert(0.0) += exp.amount;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn sample() -> Expenditure {
        let Some(date) = NaiveDate::from_ymd_opt(2025, 3, 1) else {
            panic!("valid date");
        };
        Expenditure {
            id: RecordId::new(),
            amount: 2500.0,
            date,
            description: None,
            category: ExpenditureCategory::Cycle,
            custom_category: None,
            entry_by: "admin".to_string(),
            user_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn other_requires_custom_category() {
        assert!(category_violation(ExpenditureCategory::Other, None).is_some());
        assert!(category_violation(ExpenditureCategory::Other, Some("  ")).is_some());
        assert!(category_violation(ExpenditureCategory::Other, Some("Rent")).is_none());
        assert!(category_violation(ExpenditureCategory::Ashram, None).is_none());
    }

    #[test]
    fn update_to_other_without_custom_fails_atomically() {
        let mut exp = sample();
        let update = ExpenditureUpdate {
            category: Some(ExpenditureCategory::Other),
            amount: Some(10.0),
            ..ExpenditureUpdate::default()
        };
        assert!(exp.apply_update(update).is_err());
        assert!((exp.amount - 2500.0).abs() < f64::EPSILON);
        assert_eq!(exp.category, ExpenditureCategory::Cycle);
    }

    #[test]
    fn none_unlinks_user() {
        assert_eq!(normalize_user_link("none"), None);
        assert_eq!(normalize_user_link(" u-1 "), Some("u-1".to_string()));
    }

    #[test]
    fn stats_group_by_category() {
        let mut stats = ExpenditureStats::default();
        stats.record(&sample());
        stats.record(&sample());
        assert_eq!(stats.total_count, 2);
        assert_eq!(stats.by_category.get("CYCLE").copied(), Some(5000.0));
    }
}
