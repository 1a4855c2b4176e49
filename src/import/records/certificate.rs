use std::sync::LazyLock;

use crate::domain::NewCertificate;
use crate::import::raw_row::RawRow;
use crate::import::schema::{FieldRule, FieldSpec, ImportSchema};
use crate::import::transform::{ImportRecord, TransformContext, Transformed};

use super::RowReader;

static SCHEMA: LazyLock<ImportSchema> = LazyLock::new(|| {
    ImportSchema::new(vec![
        FieldSpec::required("donationId", "Donation ID", FieldRule::Text).example("DON123456"),
        FieldSpec::required("email", "Email", FieldRule::Email).example("donor@example.com"),
        FieldSpec::required("type", "Type", FieldRule::Text).example("Food Donation"),
        FieldSpec::required("fullname", "Full name", FieldRule::Text).example("John Doe"),
        FieldSpec::required("mobile", "Mobile number", FieldRule::Mobile).example("1234567890"),
        FieldSpec::optional("description", "Description", FieldRule::Text)
            .format("optional")
            .example("Donated 100kg of rice"),
    ])
});

impl ImportRecord for NewCertificate {
    const ENTITY: &'static str = "certificate";
    const SUCCESS_MESSAGE: &'static str = "Certificates imported successfully";

    fn schema() -> &'static ImportSchema {
        &SCHEMA
    }

    fn transform(row: &RawRow, ctx: &TransformContext) -> Transformed<Self> {
        let reader = RowReader::new(&SCHEMA, row);
        Transformed::clean(Self {
            donation_id: reader.text("donationId"),
            email: reader.text("email"),
            certificate_type: reader.text("type"),
            fullname: reader.text("fullname"),
            mobile: reader.text("mobile"),
            description: reader.opt("description"),
            created_at: ctx.now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::batch_validator::validate_rows;

    #[test]
    fn mobile_must_be_exactly_ten_digits() {
        let row: RawRow = [
            ("donationId*", "DON1"),
            ("email*", "donor@example.com"),
            ("type*", "Food Donation"),
            ("fullname*", "Meera Joshi"),
            ("mobile*", "+91 98765 43210"),
        ]
        .into_iter()
        .collect();
        let report = validate_rows::<NewCertificate>(&[row]);
        assert_eq!(
            report.row(0),
            Some(["Mobile number must be 10 digits".to_string()].as_slice())
        );
    }

    #[test]
    fn template_marks_description_optional() {
        let template = NewCertificate::schema().template();
        assert_eq!(template.optional, vec!["description (optional)".to_string()]);
        assert_eq!(template.required.len(), 5);
    }
}
