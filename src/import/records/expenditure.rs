use std::sync::LazyLock;

use crate::domain::expenditure::{category_violation, normalize_user_link};
use crate::domain::{ExpenditureCategory, NewExpenditure};
use crate::import::normalize::normalize_enum;
use crate::import::raw_row::RawRow;
use crate::import::schema::{EnumRule, FieldRule, FieldSpec, ImportSchema};
use crate::import::transform::{ImportRecord, TransformContext, Transformed};

use super::RowReader;

static SCHEMA: LazyLock<ImportSchema> = LazyLock::new(|| {
    ImportSchema::new(vec![
        FieldSpec::required("amount", "Amount", FieldRule::PositiveAmount).example("2500"),
        FieldSpec::required("date", "Date", FieldRule::Date)
            .format("DD-MM-YYYY")
            .example("15-01-2025"),
        FieldSpec::required(
            "category",
            "Category",
            FieldRule::Enum(EnumRule::strict::<ExpenditureCategory>()),
        )
        .example("CYCLE"),
        FieldSpec::required("entryBy", "Entry by", FieldRule::Text).example("admin@example.com"),
        FieldSpec::optional("description", "Description", FieldRule::Text)
            .example("Bicycles for hostel students"),
        FieldSpec::optional("customCategory", "Custom category", FieldRule::Text),
        FieldSpec::optional("userId", "User ID", FieldRule::Text),
    ])
});

impl ImportRecord for NewExpenditure {
    const ENTITY: &'static str = "expenditure";
    const SUCCESS_MESSAGE: &'static str = "Expenditures imported successfully";

    fn schema() -> &'static ImportSchema {
        &SCHEMA
    }

    fn cross_check(row: &RawRow) -> Vec<String> {
        let reader = RowReader::new(&SCHEMA, row);
        let Some(category) = SCHEMA
            .value(row, "category")
            .and_then(normalize_enum::<ExpenditureCategory>)
        else {
            return Vec::new();
        };
        category_violation(category, reader.opt("customCategory").as_deref())
            .into_iter()
            .collect()
    }

    fn transform(row: &RawRow, ctx: &TransformContext) -> Transformed<Self> {
        let reader = RowReader::new(&SCHEMA, row);
        let category = reader.strict("category", ExpenditureCategory::Other);
        Transformed::clean(Self {
            amount: reader.amount("amount"),
            date: reader.date_or("date", ctx.now),
            description: reader.opt("description"),
            custom_category: if category == ExpenditureCategory::Other {
                reader.opt("customCategory")
            } else {
                None
            },
            category,
            entry_by: reader.text("entryBy"),
            user_id: reader.opt("userId").and_then(|u| normalize_user_link(&u)),
            created_at: ctx.now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::batch_validator::validate_rows;

    fn row(category: &'static str, custom: Option<&'static str>) -> RawRow {
        let mut row: RawRow = [
            ("amount*", "2500"),
            ("date (DD-MM-YYYY)*", "01-03-2025"),
            ("category*", category),
            ("entryBy*", "admin"),
        ]
        .into_iter()
        .collect();
        if let Some(custom) = custom {
            row.insert("customCategory", custom);
        }
        row
    }

    #[test]
    fn other_needs_custom_category() {
        let report = validate_rows::<NewExpenditure>(&[row("OTHER", None)]);
        assert!(!report.is_valid());
        assert!(validate_rows::<NewExpenditure>(&[row("other", Some("Rent"))]).is_valid());
    }

    #[test]
    fn custom_category_dropped_for_named_category() {
        let out = NewExpenditure::transform(&row("ashram", Some("Rent")), &TransformContext::now());
        assert_eq!(out.record.category, ExpenditureCategory::Ashram);
        assert!(out.record.custom_category.is_none());
    }
}
