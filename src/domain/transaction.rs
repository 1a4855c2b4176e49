//! Transaction records and their verification lifecycle.
//!
//! ```text
//! PENDING --(verify)--> VERIFIED   [sets verifiedBy, verifiedAt]
//! PENDING --(reject)--> REJECTED   [sets statusDescription]
//! VERIFIED/REJECTED --(edit)--> any status
//! ```
//!
//! No status is terminal. `verifiedBy`/`verifiedAt` are only kept while the
//! status is `VERIFIED`; every other transition clears them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{DateRange, RecordId};
use super::enums::{
    EntryType, MoneyFor, TransactionNature, TransactionStatus, TransactionType, UserType,
};

/// Length of generated cash references.
pub const CASH_REFERENCE_LEN: usize = 10;

const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a 10-character uppercase alphanumeric reference for a CASH
/// transaction.
///
/// Drawn from the random bytes of a UUID v4 (version and variant bytes
/// skipped). Collisions are improbable but not checked against stored
/// records.
#[must_use]
pub fn generate_cash_reference() -> String {
    let uuid = uuid::Uuid::new_v4();
    uuid.as_bytes()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 6 && *i != 8)
        .take(CASH_REFERENCE_LEN)
        .map(|(_, byte)| {
            let idx = usize::from(*byte) % REFERENCE_ALPHABET.len();
            char::from(REFERENCE_ALPHABET.get(idx).copied().unwrap_or(b'X'))
        })
        .collect()
}

/// A stored monetary movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Primary key.
    pub id: RecordId,
    /// Payment reference; generated for CASH.
    pub transaction_id: String,
    /// Donor name.
    pub name: String,
    /// Donor email.
    pub email: String,
    /// Donor phone.
    pub phone: String,
    /// Individual or organization.
    pub user_type: UserType,
    /// Positive amount in rupees.
    pub amount: f64,
    /// Payment channel.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Credit or debit.
    pub transaction_nature: TransactionNature,
    /// Value date.
    pub date: NaiveDate,
    /// Earmarked cause.
    pub money_for: MoneyFor,
    /// Free-text cause when `money_for` is OTHER.
    pub custom_money_for: Option<String>,
    /// Manual entry or donation form.
    pub entry_type: EntryType,
    /// Who entered the record.
    pub entry_by: String,
    /// When the record was entered.
    pub entry_at: DateTime<Utc>,
    /// Verification status.
    pub status: TransactionStatus,
    /// Reason attached to the status (usually a rejection note).
    pub status_description: Option<String>,
    /// Verifier, only while VERIFIED.
    pub verified_by: Option<String>,
    /// Verification time, only while VERIFIED.
    pub verified_at: Option<DateTime<Utc>>,
    /// Free-text note.
    pub description: Option<String>,
    /// Public path of the uploaded payment screenshot.
    pub screenshot_path: Option<String>,
    /// Linked user.
    pub user_id: Option<String>,
    /// Linked organization.
    pub organization_id: Option<String>,
}

/// A transaction ready to be persisted (no primary key yet).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// Payment reference.
    pub transaction_id: String,
    /// Donor name.
    pub name: String,
    /// Donor email.
    pub email: String,
    /// Donor phone.
    pub phone: String,
    /// Individual or organization.
    pub user_type: UserType,
    /// Positive amount.
    pub amount: f64,
    /// Payment channel.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Credit or debit.
    pub transaction_nature: TransactionNature,
    /// Value date.
    pub date: NaiveDate,
    /// Earmarked cause.
    pub money_for: MoneyFor,
    /// Free-text cause when OTHER.
    pub custom_money_for: Option<String>,
    /// Manual entry or donation form.
    pub entry_type: EntryType,
    /// Who entered the record.
    pub entry_by: String,
    /// When the record was entered.
    pub entry_at: DateTime<Utc>,
    /// Verification status.
    pub status: TransactionStatus,
    /// Status note.
    pub status_description: Option<String>,
    /// Verifier.
    pub verified_by: Option<String>,
    /// Verification time.
    pub verified_at: Option<DateTime<Utc>>,
    /// Free-text note.
    pub description: Option<String>,
    /// Screenshot path.
    pub screenshot_path: Option<String>,
    /// Linked user.
    pub user_id: Option<String>,
    /// Linked organization.
    pub organization_id: Option<String>,
}

impl NewTransaction {
    /// Attaches a primary key, producing the stored form.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> Transaction {
        Transaction {
            id,
            transaction_id: self.transaction_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            user_type: self.user_type,
            amount: self.amount,
            transaction_type: self.transaction_type,
            transaction_nature: self.transaction_nature,
            date: self.date,
            money_for: self.money_for,
            custom_money_for: self.custom_money_for,
            entry_type: self.entry_type,
            entry_by: self.entry_by,
            entry_at: self.entry_at,
            status: self.status,
            status_description: self.status_description,
            verified_by: self.verified_by,
            verified_at: self.verified_at,
            description: self.description,
            screenshot_path: self.screenshot_path,
            user_id: self.user_id,
            organization_id: self.organization_id,
        }
    }
}

/// Admin-driven status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    /// Mark as VERIFIED by the given admin.
    Verify {
        /// Verifier name or email.
        verified_by: String,
    },
    /// Mark as REJECTED with an optional reason.
    Reject {
        /// Stored as `statusDescription`.
        reason: Option<String>,
    },
    /// Move back to PENDING.
    Reopen,
}

/// Partial update submitted by the edit form. Absent fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    /// New payment reference.
    pub transaction_id: Option<String>,
    /// New donor name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New user type.
    pub user_type: Option<UserType>,
    /// New amount (must be positive).
    pub amount: Option<f64>,
    /// New payment channel.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// New nature.
    pub transaction_nature: Option<TransactionNature>,
    /// New value date.
    pub date: Option<NaiveDate>,
    /// New cause.
    pub money_for: Option<MoneyFor>,
    /// New custom cause.
    pub custom_money_for: Option<String>,
    /// New entry type.
    pub entry_type: Option<EntryType>,
    /// New entry author.
    pub entry_by: Option<String>,
    /// New status.
    pub status: Option<TransactionStatus>,
    /// New status note.
    pub status_description: Option<String>,
    /// Verifier (used when the status is VERIFIED).
    pub verified_by: Option<String>,
    /// Verification time (defaults to now when moving to VERIFIED).
    pub verified_at: Option<DateTime<Utc>>,
    /// New note.
    pub description: Option<String>,
    /// Linked user.
    pub user_id: Option<String>,
    /// Linked organization.
    pub organization_id: Option<String>,
}

impl Transaction {
    /// Applies an admin status transition.
    pub fn apply_status(&mut self, change: StatusChange, now: DateTime<Utc>) {
        match change {
            StatusChange::Verify { verified_by } => {
                self.status = TransactionStatus::Verified;
                self.verified_by = Some(verified_by);
                self.verified_at = Some(now);
            }
            StatusChange::Reject { reason } => {
                self.status = TransactionStatus::Rejected;
                self.status_description = reason;
                self.clear_verification();
            }
            StatusChange::Reopen => {
                self.status = TransactionStatus::Pending;
                self.clear_verification();
            }
        }
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns a message when the update would break a record invariant:
    /// a non-positive amount, or an empty reference on a non-CASH
    /// transaction.
    pub fn apply_update(&mut self, update: TransactionUpdate, now: DateTime<Utc>) -> Result<(), String> {
        if let Some(amount) = update.amount
            && !(amount.is_finite() && amount > 0.0)
        {
            return Err("Amount must be a positive number".to_string());
        }

        set_text(&mut self.name, update.name);
        set_text(&mut self.email, update.email);
        set_text(&mut self.phone, update.phone);
        set_text(&mut self.entry_by, update.entry_by);
        if let Some(reference) = update.transaction_id {
            self.transaction_id = reference.trim().to_string();
        }
        if let Some(v) = update.user_type {
            self.user_type = v;
        }
        if let Some(v) = update.amount {
            self.amount = v;
        }
        if let Some(v) = update.transaction_type {
            self.transaction_type = v;
        }
        if let Some(v) = update.transaction_nature {
            self.transaction_nature = v;
        }
        if let Some(v) = update.date {
            self.date = v;
        }
        if let Some(v) = update.money_for {
            self.money_for = v;
        }
        if let Some(v) = update.entry_type {
            self.entry_type = v;
        }
        if update.custom_money_for.is_some() {
            self.custom_money_for = non_empty(update.custom_money_for);
        }
        if update.description.is_some() {
            self.description = non_empty(update.description);
        }
        if update.status_description.is_some() {
            self.status_description = non_empty(update.status_description);
        }
        if update.user_id.is_some() {
            self.user_id = non_empty(update.user_id);
        }
        if update.organization_id.is_some() {
            self.organization_id = non_empty(update.organization_id);
        }

        if self.transaction_id.is_empty() {
            if self.transaction_type == TransactionType::Cash {
                self.transaction_id = generate_cash_reference();
            } else {
                return Err("Transaction ID is required".to_string());
            }
        }

        if self.money_for != MoneyFor::Other {
            self.custom_money_for = None;
        }

        if let Some(status) = update.status {
            self.status = status;
        }
        if self.status == TransactionStatus::Verified {
            if let Some(by) = non_empty(update.verified_by) {
                self.verified_by = Some(by);
            }
            self.verified_at = update.verified_at.or(self.verified_at).or(Some(now));
        } else {
            self.clear_verification();
        }
        Ok(())
    }

    fn clear_verification(&mut self) {
        self.verified_by = None;
        self.verified_at = None;
    }
}

fn set_text(slot: &mut String, value: Option<String>) {
    if let Some(v) = value {
        let trimmed = v.trim();
        if !trimmed.is_empty() {
            *slot = trimmed.to_string();
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Search criteria for transaction listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of name, email or reference.
    pub search: Option<String>,
    /// Exact status.
    pub status: Option<TransactionStatus>,
    /// Inclusive value-date range.
    pub date_range: DateRange,
}

impl TransactionFilter {
    /// Returns `true` if the transaction satisfies every criterion.
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = [&tx.name, &tx.email, &tx.transaction_id]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if let Some(status) = self.status
            && tx.status != status
        {
            return false;
        }
        self.date_range.contains(tx.date)
    }
}

/// Aggregate figures for the transactions dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    /// Credit sum minus debit sum.
    pub total_amount: f64,
    /// Number of transactions.
    pub total_transactions: u64,
    /// Sum of CREDIT amounts.
    pub credit_amount: f64,
    /// Sum of DEBIT amounts.
    pub debit_amount: f64,
    /// Number of CREDIT transactions.
    pub credit_transactions: u64,
    /// Number of DEBIT transactions.
    pub debit_transactions: u64,
    /// Number of PENDING transactions.
    pub pending_count: u64,
    /// Number of VERIFIED transactions.
    pub verified_count: u64,
    /// Number of REJECTED transactions.
    pub rejected_count: u64,
}

impl TransactionStats {
    /// Folds one transaction into the totals.
    pub fn record(&mut self, tx: &Transaction) {
        self.total_transactions += 1;
        match tx.transaction_nature {
            TransactionNature::Credit => {
                self.credit_amount += tx.amount;
                self.credit_transactions += 1;
            }
            TransactionNature::Debit => {
                self.debit_amount += tx.amount;
                self.debit_transactions += 1;
            }
        }
        match tx.status {
            TransactionStatus::Pending => self.pending_count += 1,
            TransactionStatus::Verified => self.verified_count += 1,
            TransactionStatus::Rejected => self.rejected_count += 1,
        }
        self.total_amount = self.credit_amount - self.debit_amount;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample(reference: &str) -> Transaction {
        let Some(date) = NaiveDate::from_ymd_opt(2025, 1, 15) else {
            panic!("valid date");
        };
        Transaction {
            id: RecordId::new(),
            transaction_id: reference.to_string(),
            name: "Asha Patil".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+91 9876543210".to_string(),
            user_type: UserType::Individual,
            amount: 1000.0,
            transaction_type: TransactionType::Upi,
            transaction_nature: TransactionNature::Credit,
            date,
            money_for: MoneyFor::Education,
            custom_money_for: None,
            entry_type: EntryType::Manual,
            entry_by: "admin@example.com".to_string(),
            entry_at: Utc::now(),
            status: TransactionStatus::Pending,
            status_description: None,
            verified_by: None,
            verified_at: None,
            description: None,
            screenshot_path: None,
            user_id: None,
            organization_id: None,
        }
    }

    #[test]
    fn cash_reference_is_ten_uppercase_alphanumerics() {
        let reference = generate_cash_reference();
        assert_eq!(reference.len(), CASH_REFERENCE_LEN);
        assert!(
            reference
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn cash_references_differ() {
        assert_ne!(generate_cash_reference(), generate_cash_reference());
    }

    #[test]
    fn verify_sets_verifier_and_time() {
        let mut tx = sample("TXN1");
        let now = Utc::now();
        tx.apply_status(
            StatusChange::Verify {
                verified_by: "treasurer".to_string(),
            },
            now,
        );
        assert_eq!(tx.status, TransactionStatus::Verified);
        assert_eq!(tx.verified_by.as_deref(), Some("treasurer"));
        assert_eq!(tx.verified_at, Some(now));
    }

    #[test]
    fn reject_after_verify_clears_verification() {
        let mut tx = sample("TXN1");
        let now = Utc::now();
        tx.apply_status(
            StatusChange::Verify {
                verified_by: "treasurer".to_string(),
            },
            now,
        );
        tx.apply_status(
            StatusChange::Reject {
                reason: Some("amount mismatch".to_string()),
            },
            now,
        );
        assert_eq!(tx.status, TransactionStatus::Rejected);
        assert_eq!(tx.status_description.as_deref(), Some("amount mismatch"));
        assert!(tx.verified_by.is_none());
        assert!(tx.verified_at.is_none());
    }

    #[test]
    fn rejected_can_be_reopened() {
        let mut tx = sample("TXN1");
        tx.apply_status(StatusChange::Reject { reason: None }, Utc::now());
        tx.apply_status(StatusChange::Reopen, Utc::now());
        assert_eq!(tx.status, TransactionStatus::Pending);
    }

    #[test]
    fn update_rejects_non_positive_amount() {
        let mut tx = sample("TXN1");
        let update = TransactionUpdate {
            amount: Some(0.0),
            ..TransactionUpdate::default()
        };
        assert!(tx.apply_update(update, Utc::now()).is_err());
        assert!((tx.amount - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn update_to_verified_stamps_time() {
        let mut tx = sample("TXN1");
        let now = Utc::now();
        let update = TransactionUpdate {
            status: Some(TransactionStatus::Verified),
            verified_by: Some("treasurer".to_string()),
            ..TransactionUpdate::default()
        };
        assert!(tx.apply_update(update, now).is_ok());
        assert_eq!(tx.verified_at, Some(now));
        assert_eq!(tx.verified_by.as_deref(), Some("treasurer"));
    }

    #[test]
    fn update_away_from_other_drops_custom_cause() {
        let mut tx = sample("TXN1");
        tx.money_for = MoneyFor::Other;
        tx.custom_money_for = Some("Library".to_string());
        let update = TransactionUpdate {
            money_for: Some(MoneyFor::Food),
            ..TransactionUpdate::default()
        };
        assert!(tx.apply_update(update, Utc::now()).is_ok());
        assert!(tx.custom_money_for.is_none());
    }

    #[test]
    fn clearing_reference_on_cash_regenerates_it() {
        let mut tx = sample("TXN1");
        let update = TransactionUpdate {
            transaction_type: Some(TransactionType::Cash),
            transaction_id: Some(String::new()),
            ..TransactionUpdate::default()
        };
        assert!(tx.apply_update(update, Utc::now()).is_ok());
        assert_eq!(tx.transaction_id.len(), CASH_REFERENCE_LEN);
    }

    #[test]
    fn clearing_reference_on_upi_is_rejected() {
        let mut tx = sample("TXN1");
        let update = TransactionUpdate {
            transaction_id: Some("  ".to_string()),
            ..TransactionUpdate::default()
        };
        assert!(tx.apply_update(update, Utc::now()).is_err());
    }

    #[test]
    fn filter_matches_search_status_and_range() {
        let tx = sample("TXN-ABC");
        let Some(start) = NaiveDate::from_ymd_opt(2025, 1, 1) else {
            panic!("valid date");
        };
        let Some(end) = NaiveDate::from_ymd_opt(2025, 1, 31) else {
            panic!("valid date");
        };
        let filter = TransactionFilter {
            search: Some("abc".to_string()),
            status: Some(TransactionStatus::Pending),
            date_range: DateRange::between(start, end),
        };
        assert!(filter.matches(&tx));

        let miss = TransactionFilter {
            status: Some(TransactionStatus::Verified),
            ..TransactionFilter::default()
        };
        assert!(!miss.matches(&tx));
    }

    #[test]
    fn stats_net_credit_against_debit() {
        let mut stats = TransactionStats::default();
        let credit = sample("A");
        let mut debit = sample("B");
        debit.transaction_nature = TransactionNature::Debit;
        debit.amount = 300.0;
        stats.record(&credit);
        stats.record(&debit);
        assert_eq!(stats.total_transactions, 2);
        assert!((stats.total_amount - 700.0).abs() < f64::EPSILON);
        assert_eq!(stats.pending_count, 2);
    }
}
