//! Database row models and their conversion to domain records.
//!
//! Enum columns are stored as their canonical token text; a token that no
//! longer parses surfaces as [`AdminError::Persistence`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{
    Certificate, DonationRequest, Drive, Expenditure, GeoLocation, RecordId, Transaction,
    UserSummary,
};
use crate::error::AdminError;

fn token<T>(column: &str, value: &str) -> Result<T, AdminError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| AdminError::Persistence(format!("column {column}: {e}")))
}

/// A row of the `transactions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionRow {
    /// Primary key.
    pub id: Uuid,
    /// Unique payment reference.
    pub transaction_id: String,
    /// Donor name.
    pub name: String,
    /// Donor email.
    pub email: String,
    /// Donor phone.
    pub phone: String,
    /// `UserType` token.
    pub user_type: String,
    /// Amount.
    pub amount: f64,
    /// `TransactionType` token.
    pub transaction_type: String,
    /// `TransactionNature` token.
    pub transaction_nature: String,
    /// Value date.
    pub date: NaiveDate,
    /// `MoneyFor` token.
    pub money_for: String,
    /// Custom cause.
    pub custom_money_for: Option<String>,
    /// `EntryType` token.
    pub entry_type: String,
    /// Entry author.
    pub entry_by: String,
    /// Entry time.
    pub entry_at: DateTime<Utc>,
    /// `TransactionStatus` token.
    pub status: String,
    /// Status note.
    pub status_description: Option<String>,
    /// Verifier.
    pub verified_by: Option<String>,
    /// Verification time.
    pub verified_at: Option<DateTime<Utc>>,
    /// Note.
    pub description: Option<String>,
    /// Screenshot path.
    pub screenshot_path: Option<String>,
    /// Linked user.
    pub user_id: Option<String>,
    /// Linked organization.
    pub organization_id: Option<String>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = AdminError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RecordId::from_uuid(row.id),
            transaction_id: row.transaction_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            user_type: token("user_type", &row.user_type)?,
            amount: row.amount,
            transaction_type: token("transaction_type", &row.transaction_type)?,
            transaction_nature: token("transaction_nature", &row.transaction_nature)?,
            date: row.date,
            money_for: token("money_for", &row.money_for)?,
            custom_money_for: row.custom_money_for,
            entry_type: token("entry_type", &row.entry_type)?,
            entry_by: row.entry_by,
            entry_at: row.entry_at,
            status: token("status", &row.status)?,
            status_description: row.status_description,
            verified_by: row.verified_by,
            verified_at: row.verified_at,
            description: row.description,
            screenshot_path: row.screenshot_path,
            user_id: row.user_id,
            organization_id: row.organization_id,
        })
    }
}

/// A row of the `drives` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DriveRow {
    /// Primary key.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Venue.
    pub location: String,
    /// Description.
    pub description: String,
    /// `DriveStatus` token.
    pub status: String,
    /// Category.
    pub dtype: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Hours.
    pub time_interval: String,
    /// Latitude text.
    pub latitude: Option<String>,
    /// Longitude text.
    pub longitude: Option<String>,
    /// Map link.
    pub place_link: Option<String>,
    /// Photo paths.
    pub photos: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DriveRow> for Drive {
    type Error = AdminError;

    fn try_from(row: DriveRow) -> Result<Self, Self::Error> {
        let geo_location = match (row.latitude, row.longitude) {
            (None, None) => None,
            (lat, long) => Some(GeoLocation {
                latitude: lat.unwrap_or_default(),
                longitude: long.unwrap_or_default(),
            }),
        };
        Ok(Self {
            id: RecordId::from_uuid(row.id),
            title: row.title,
            location: row.location,
            description: row.description,
            status: token("status", &row.status)?,
            dtype: row.dtype,
            start_date: row.start_date,
            end_date: row.end_date,
            time_interval: row.time_interval,
            geo_location,
            place_link: row.place_link,
            photos: row.photos,
            created_at: row.created_at,
        })
    }
}

/// A row of the `expenditures` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExpenditureRow {
    /// Primary key.
    pub id: Uuid,
    /// Amount.
    pub amount: f64,
    /// Spending date.
    pub date: NaiveDate,
    /// Note.
    pub description: Option<String>,
    /// `ExpenditureCategory` token.
    pub category: String,
    /// Custom category.
    pub custom_category: Option<String>,
    /// Entry author.
    pub entry_by: String,
    /// Beneficiary.
    pub user_id: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ExpenditureRow> for Expenditure {
    type Error = AdminError;

    fn try_from(row: ExpenditureRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RecordId::from_uuid(row.id),
            amount: row.amount,
            date: row.date,
            description: row.description,
            category: token("category", &row.category)?,
            custom_category: row.custom_category,
            entry_by: row.entry_by,
            user_id: row.user_id,
            created_at: row.created_at,
        })
    }
}

/// A row of the `certificates` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CertificateRow {
    /// Primary key.
    pub id: Uuid,
    /// Donation reference.
    pub donation_id: String,
    /// Donor email.
    pub email: String,
    /// Certificate kind.
    pub certificate_type: String,
    /// Donor name.
    pub fullname: String,
    /// Mobile number.
    pub mobile: String,
    /// Note.
    pub description: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<CertificateRow> for Certificate {
    fn from(row: CertificateRow) -> Self {
        Self {
            id: RecordId::from_uuid(row.id),
            donation_id: row.donation_id,
            email: row.email,
            certificate_type: row.certificate_type,
            fullname: row.fullname,
            mobile: row.mobile,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// A row of the `donation_requests` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationRequestRow {
    /// Primary key.
    pub id: Uuid,
    /// Donor name.
    pub fullname: String,
    /// Donor phone.
    pub mobile: String,
    /// Donor email.
    pub email: String,
    /// Pick-up address.
    pub address: String,
    /// What is donated.
    pub donation_type: String,
    /// Quantity.
    pub quantity: String,
    /// Review status.
    pub status: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<DonationRequestRow> for DonationRequest {
    fn from(row: DonationRequestRow) -> Self {
        Self {
            id: RecordId::from_uuid(row.id),
            fullname: row.fullname,
            mobile: row.mobile,
            email: row.email,
            address: row.address,
            donation_type: row.donation_type,
            quantity: row.quantity,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// A row of the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    /// Primary key.
    pub id: Uuid,
    /// Full name.
    pub fullname: String,
    /// Email.
    pub email: String,
    /// Address.
    pub address: Option<String>,
    /// Mobile.
    pub mobile: Option<String>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        Self {
            id: RecordId::from_uuid(row.id),
            fullname: row.fullname,
            email: row.email,
            address: row.address,
            mobile: row.mobile,
            created_at: row.created_at,
        }
    }
}
