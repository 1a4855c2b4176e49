use std::sync::LazyLock;

use crate::domain::transaction::generate_cash_reference;
use crate::domain::{
    EntryType, MoneyFor, NewTransaction, TransactionNature, TransactionStatus, TransactionType,
    UserType,
};
use crate::import::normalize::normalize_enum_or;
use crate::import::raw_row::RawRow;
use crate::import::schema::{EnumRule, FieldRule, FieldSpec, ImportSchema};
use crate::import::transform::{ImportRecord, TransformContext, Transformed};

use super::RowReader;

static SCHEMA: LazyLock<ImportSchema> = LazyLock::new(|| {
    ImportSchema::new(vec![
        FieldSpec::required("name", "Name", FieldRule::Text).example("John Doe"),
        FieldSpec::required("email", "Email", FieldRule::Email).example("john@example.com"),
        FieldSpec::required("phone", "Phone number", FieldRule::Phone).example("+91 9876543210"),
        FieldSpec::required(
            "userType",
            "User type",
            FieldRule::Enum(EnumRule::strict::<UserType>()),
        )
        .example("INDIVIDUAL"),
        FieldSpec::required("amount", "Amount", FieldRule::PositiveAmount).example("1000"),
        FieldSpec::required(
            "type",
            "Transaction type",
            FieldRule::Enum(EnumRule::lenient(TransactionType::Cash)),
        )
        .example("UPI"),
        FieldSpec::required("transactionId", "Transaction ID", FieldRule::Text)
            .unless(is_cash)
            .example("TXN123456"),
        FieldSpec::required("date", "Date", FieldRule::Date)
            .format("DD-MM-YYYY")
            .example("15-01-2025"),
        FieldSpec::required(
            "transactionNature",
            "Transaction nature",
            FieldRule::Enum(EnumRule::strict::<TransactionNature>()),
        )
        .example("CREDIT"),
        FieldSpec::required(
            "entryType",
            "Entry type",
            FieldRule::Enum(EnumRule::strict::<EntryType>()),
        )
        .example("MANUAL"),
        FieldSpec::required("entryBy", "Entry by", FieldRule::Text).example("admin@example.com"),
        FieldSpec::required(
            "moneyFor",
            "Money for category",
            FieldRule::Enum(EnumRule::lenient(MoneyFor::Other)),
        )
        .example("EDUCATION"),
        FieldSpec::optional("screenshotPath", "Screenshot path", FieldRule::Text)
            .example("path/to/screenshot.jpg"),
        FieldSpec::optional("description", "Description", FieldRule::Text)
            .example("Monthly donation"),
        FieldSpec::optional(
            "status",
            "Status",
            FieldRule::Enum(EnumRule::strict::<TransactionStatus>()),
        )
        .format("PENDING/VERIFIED/REJECTED")
        .example("PENDING"),
        FieldSpec::optional("statusDescription", "Status description", FieldRule::Text),
        FieldSpec::optional("verifiedBy", "Verified by", FieldRule::Text),
        FieldSpec::optional("verifiedAt", "Verified at date", FieldRule::Date).format("DD-MM-YYYY"),
        FieldSpec::optional("customMoneyFor", "Custom money for", FieldRule::Text),
        FieldSpec::optional("userId", "User ID", FieldRule::Text),
        FieldSpec::optional("organizationId", "Organization ID", FieldRule::Text),
    ])
});

/// The reference may be omitted when the payment type resolves to CASH,
/// including the CASH default for unrecognised types.
fn is_cash(row: &RawRow) -> bool {
    let raw = SCHEMA.value(row, "type");
    raw.is_some() && normalize_enum_or(raw, TransactionType::Cash).value == TransactionType::Cash
}

impl ImportRecord for NewTransaction {
    const ENTITY: &'static str = "transaction";
    const SUCCESS_MESSAGE: &'static str = "Transactions imported successfully";

    fn schema() -> &'static ImportSchema {
        &SCHEMA
    }

    fn transform(row: &RawRow, ctx: &TransformContext) -> Transformed<Self> {
        let mut reader = RowReader::new(&SCHEMA, row);
        let transaction_type = reader.lenient("type", TransactionType::Cash);
        let money_for = reader.lenient("moneyFor", MoneyFor::Other);
        let status = reader.strict("status", TransactionStatus::Pending);

        let transaction_id = reader
            .opt("transactionId")
            .unwrap_or_else(generate_cash_reference);

        let (verified_by, verified_at) = if status == TransactionStatus::Verified {
            let at = reader
                .date("verifiedAt")
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map_or(ctx.now, |dt| dt.and_utc());
            (reader.opt("verifiedBy"), Some(at))
        } else {
            (None, None)
        };

        let record = Self {
            transaction_id,
            name: reader.text("name"),
            email: reader.text("email"),
            phone: reader.text("phone"),
            user_type: reader.strict("userType", UserType::Individual),
            amount: reader.amount("amount"),
            transaction_type,
            transaction_nature: reader.strict("transactionNature", TransactionNature::Credit),
            date: reader.date_or("date", ctx.now),
            custom_money_for: if money_for == MoneyFor::Other {
                reader.opt("customMoneyFor")
            } else {
                None
            },
            money_for,
            entry_type: reader.strict("entryType", EntryType::Manual),
            entry_by: reader.text("entryBy"),
            entry_at: ctx.now,
            status,
            status_description: reader.opt("statusDescription"),
            verified_by,
            verified_at,
            description: reader.opt("description"),
            screenshot_path: reader.opt("screenshotPath"),
            user_id: reader.opt("userId"),
            organization_id: reader.opt("organizationId"),
        };
        Transformed {
            record,
            defaults: reader.into_defaults(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::CASH_REFERENCE_LEN;
    use crate::import::batch_validator::validate_rows;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().copied().collect()
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("name*", " John Doe "),
            ("email*", "john@example.com"),
            ("phone*", "+91 9876543210"),
            ("userType*", "individual"),
            ("amount*", "1000"),
            ("type*", "UPI"),
            ("transactionId*", "TXN123456"),
            ("date (DD-MM-YYYY)*", "15-01-2025"),
            ("transactionNature*", "CREDIT"),
            ("entryType*", "MANUAL"),
            ("entryBy*", "admin@example.com"),
            ("moneyFor*", "EDUCATION"),
        ]
    }

    fn with(overrides: &[(&'static str, &'static str)]) -> RawRow {
        let mut pairs = base();
        pairs.retain(|(k, _)| !overrides.iter().any(|(o, _)| o == k));
        pairs.extend_from_slice(overrides);
        row(&pairs)
    }

    #[test]
    fn transform_trims_and_defaults_status() {
        let out = NewTransaction::transform(&with(&[]), &TransformContext::now());
        assert_eq!(out.record.name, "John Doe");
        assert_eq!(out.record.user_type, UserType::Individual);
        assert_eq!(out.record.status, TransactionStatus::Pending);
        assert_eq!(out.record.date.to_string(), "2025-01-15");
        assert!(out.defaults.is_empty());
    }

    #[test]
    fn cash_without_reference_is_valid_and_generated() {
        let input = with(&[("type*", "cash"), ("transactionId*", "")]);
        assert!(validate_rows::<NewTransaction>(std::slice::from_ref(&input)).is_valid());
        let out = NewTransaction::transform(&input, &TransformContext::now());
        assert_eq!(out.record.transaction_type, TransactionType::Cash);
        assert_eq!(out.record.transaction_id.len(), CASH_REFERENCE_LEN);
        assert!(
            out.record
                .transaction_id
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn upi_without_reference_is_rejected() {
        let input = with(&[("transactionId*", "")]);
        let report = validate_rows::<NewTransaction>(&[input]);
        assert_eq!(
            report.row(0),
            Some(["Transaction ID is required".to_string()].as_slice())
        );
    }

    #[test]
    fn unknown_type_and_cause_are_defaulted_and_flagged() {
        let input = with(&[("type*", "cheque"), ("moneyFor*", "books")]);
        assert!(validate_rows::<NewTransaction>(std::slice::from_ref(&input)).is_valid());
        let out = NewTransaction::transform(&input, &TransformContext::now());
        assert_eq!(out.record.transaction_type, TransactionType::Cash);
        assert_eq!(out.record.money_for, MoneyFor::Other);
        let fields: Vec<_> = out.defaults.iter().map(|d| (d.field, d.value)).collect();
        assert_eq!(fields, vec![("type", "CASH"), ("moneyFor", "OTHER")]);
        // An explicit reference is kept even though the type fell back to CASH.
        assert_eq!(out.record.transaction_id, "TXN123456");
    }

    #[test]
    fn other_without_custom_cause_is_still_importable() {
        let input = with(&[("moneyFor*", "OTHER")]);
        assert!(validate_rows::<NewTransaction>(std::slice::from_ref(&input)).is_valid());
        let out = NewTransaction::transform(&input, &TransformContext::now());
        assert_eq!(out.record.money_for, MoneyFor::Other);
        assert!(out.record.custom_money_for.is_none());
        assert!(out.defaults.is_empty());
    }

    #[test]
    fn custom_cause_is_dropped_unless_other() {
        let input = with(&[("customMoneyFor", "Library")]);
        let out = NewTransaction::transform(&input, &TransformContext::now());
        assert!(out.record.custom_money_for.is_none());
    }

    #[test]
    fn verification_fields_only_survive_on_verified() {
        let pending = with(&[("verifiedBy", "treasurer"), ("verifiedAt (DD-MM-YYYY)", "16-01-2025")]);
        let out = NewTransaction::transform(&pending, &TransformContext::now());
        assert!(out.record.verified_by.is_none());
        assert!(out.record.verified_at.is_none());

        let verified = with(&[
            ("status (PENDING/VERIFIED/REJECTED)", "verified"),
            ("verifiedBy", "treasurer"),
            ("verifiedAt (DD-MM-YYYY)", "16-01-2025"),
        ]);
        let out = NewTransaction::transform(&verified, &TransformContext::now());
        assert_eq!(out.record.status, TransactionStatus::Verified);
        assert_eq!(out.record.verified_by.as_deref(), Some("treasurer"));
        assert_eq!(
            out.record.verified_at.map(|t| t.date_naive().to_string()),
            Some("2025-01-16".to_string())
        );
    }

    #[test]
    fn template_matches_download_headers() {
        let template = NewTransaction::schema().template();
        assert_eq!(template.required.len(), 12);
        assert!(template.required.contains(&"date (DD-MM-YYYY)*".to_string()));
        assert!(template.required.contains(&"transactionId*".to_string()));
        assert!(
            template
                .optional
                .contains(&"status (PENDING/VERIFIED/REJECTED)".to_string())
        );
        assert!(template.optional.contains(&"verifiedAt (DD-MM-YYYY)".to_string()));
    }
}
