//! Column layouts of the admin exports.

use chrono::{DateTime, NaiveDate, Utc};

use super::Table;
use crate::domain::{DonationRequest, Drive, Transaction, UserSummary};

const TRANSACTION_COLUMNS: [&str; 18] = [
    "Date",
    "Name",
    "Email",
    "Phone",
    "Amount",
    "Transaction Type",
    "Transaction Nature",
    "Transaction ID",
    "Status",
    "Entry Type",
    "Entry By",
    "Entry At",
    "Description",
    "Money For",
    "Custom Category",
    "User Type",
    "Verified By",
    "Verified At",
];

fn day(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

fn stamp(at: DateTime<Utc>) -> String {
    at.format("%d-%m-%Y %H:%M:%S").to_string()
}

fn opt(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

/// Full transaction ledger, one row per transaction.
#[must_use]
pub fn transaction_table(transactions: &[Transaction]) -> Table {
    let mut table = Table::new("Transactions", TRANSACTION_COLUMNS);
    for tx in transactions {
        table.push_row(vec![
            day(tx.date),
            tx.name.clone(),
            tx.email.clone(),
            tx.phone.clone(),
            format!("{:.2}", tx.amount),
            tx.transaction_type.to_string(),
            tx.transaction_nature.to_string(),
            tx.transaction_id.clone(),
            tx.status.to_string(),
            tx.entry_type.to_string(),
            tx.entry_by.clone(),
            stamp(tx.entry_at),
            opt(tx.description.as_ref()),
            tx.money_for.to_string(),
            opt(tx.custom_money_for.as_ref()),
            tx.user_type.to_string(),
            opt(tx.verified_by.as_ref()),
            tx.verified_at.map(stamp).unwrap_or_default(),
        ]);
    }
    table
}

/// Drives overview.
#[must_use]
pub fn drive_table(drives: &[Drive]) -> Table {
    let mut table = Table::new(
        "Drives",
        [
            "id",
            "title",
            "location",
            "dtype",
            "status",
            "startDate",
            "EndDate",
            "createdAt",
            "description",
        ],
    );
    for drive in drives {
        table.push_row(vec![
            drive.id.to_string(),
            drive.title.clone(),
            drive.location.clone(),
            drive.dtype.clone(),
            drive.status.to_string(),
            day(drive.start_date),
            day(drive.end_date),
            stamp(drive.created_at),
            drive.description.clone(),
        ]);
    }
    table
}

/// Registered users.
#[must_use]
pub fn user_table(users: &[UserSummary]) -> Table {
    let mut table = Table::new(
        "Users",
        ["id", "fullname", "email", "address", "mobile", "createdAt"],
    );
    for user in users {
        table.push_row(vec![
            user.id.to_string(),
            user.fullname.clone(),
            user.email.clone(),
            opt(user.address.as_ref()),
            opt(user.mobile.as_ref()),
            stamp(user.created_at),
        ]);
    }
    table
}

/// Donation requests.
#[must_use]
pub fn donation_table(requests: &[DonationRequest]) -> Table {
    let mut table = Table::new(
        "Donations",
        [
            "id",
            "fullname",
            "email",
            "mobile",
            "type",
            "quantity",
            "status",
            "createdAt",
        ],
    );
    for request in requests {
        table.push_row(vec![
            request.id.to_string(),
            request.fullname.clone(),
            request.email.clone(),
            request.mobile.clone(),
            request.donation_type.clone(),
            request.quantity.clone(),
            request.status.clone(),
            stamp(request.created_at),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::drive::tests::sample as sample_drive;
    use crate::domain::transaction::tests::sample as sample_tx;

    #[test]
    fn transaction_rows_align_with_columns() {
        let table = transaction_table(&[sample_tx("UPI123")]);
        assert_eq!(table.headers.len(), TRANSACTION_COLUMNS.len());
        let row = table.rows.first().map(Vec::len);
        assert_eq!(row, Some(TRANSACTION_COLUMNS.len()));
        assert_eq!(
            table.rows.first().and_then(|r| r.get(7)).map(String::as_str),
            Some("UPI123")
        );
    }

    #[test]
    fn drive_dates_use_day_first_format() {
        let drive = sample_drive();
        let table = drive_table(std::slice::from_ref(&drive));
        assert_eq!(
            table.rows.first().and_then(|r| r.get(5)),
            Some(&drive.start_date.format("%d-%m-%Y").to_string())
        );
    }
}
