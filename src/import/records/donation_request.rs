use std::sync::LazyLock;

use crate::domain::NewDonationRequest;
use crate::domain::donation_request::INITIAL_REQUEST_STATUS;
use crate::import::raw_row::RawRow;
use crate::import::schema::{FieldRule, FieldSpec, ImportSchema};
use crate::import::transform::{ImportRecord, TransformContext, Transformed};

use super::RowReader;

static SCHEMA: LazyLock<ImportSchema> = LazyLock::new(|| {
    ImportSchema::new(vec![
        FieldSpec::required("fullname", "Full name", FieldRule::Text).example("John Doe"),
        FieldSpec::required("mobile", "Mobile number", FieldRule::Phone).example("9876543210"),
        FieldSpec::required("email", "Email", FieldRule::Email).example("john@example.com"),
        FieldSpec::required("address", "Address", FieldRule::Text).example("Kothrud, Pune"),
        FieldSpec::required("type", "Type", FieldRule::Text).example("Clothes"),
        FieldSpec::required("quantity", "Quantity", FieldRule::Text).example("10 kg"),
    ])
});

impl ImportRecord for NewDonationRequest {
    const ENTITY: &'static str = "donation request";
    const SUCCESS_MESSAGE: &'static str = "Donation requests imported successfully";

    fn schema() -> &'static ImportSchema {
        &SCHEMA
    }

    fn transform(row: &RawRow, ctx: &TransformContext) -> Transformed<Self> {
        let reader = RowReader::new(&SCHEMA, row);
        Transformed::clean(Self {
            fullname: reader.text("fullname"),
            mobile: reader.text("mobile"),
            email: reader.text("email").to_lowercase(),
            address: reader.text("address"),
            donation_type: reader.text("type"),
            quantity: reader.text("quantity"),
            status: INITIAL_REQUEST_STATUS.to_string(),
            created_at: ctx.now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::batch_validator::validate_rows;

    #[test]
    fn email_is_lowercased_and_status_fixed() {
        let row: RawRow = [
            ("fullname", "Ravi Kulkarni"),
            ("mobile", "98765-43210"),
            ("email", "Ravi@Example.COM"),
            ("address", "Kothrud, Pune"),
            ("type", "Books"),
            ("quantity", "20"),
        ]
        .into_iter()
        .collect();
        assert!(validate_rows::<NewDonationRequest>(std::slice::from_ref(&row)).is_valid());
        let out = NewDonationRequest::transform(&row, &TransformContext::now());
        assert_eq!(out.record.email, "ravi@example.com");
        assert_eq!(out.record.status, "Pending");
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let row: RawRow = [("fullname", "Ravi")].into_iter().collect();
        let report = validate_rows::<NewDonationRequest>(&[row]);
        assert_eq!(report.row(0).map(<[String]>::len), Some(5));
    }
}
