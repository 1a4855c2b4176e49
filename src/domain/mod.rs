//! Domain layer: the records the admin panel manages.
//!
//! Each submodule owns one entity: its stored form, the `New*` form handed
//! to persistence, partial updates, listing filters and dashboard totals.
//! Nothing here touches I/O.

pub mod certificate;
pub mod date_range;
pub mod donation_request;
pub mod drive;
pub mod enums;
pub mod expenditure;
pub mod record_id;
pub mod transaction;

pub use certificate::{Certificate, NewCertificate};
pub use date_range::DateRange;
pub use donation_request::{DirectoryFilter, DonationRequest, NewDonationRequest, UserSummary};
pub use drive::{Drive, DriveFilter, DriveUpdate, GeoLocation, NewDrive};
pub use enums::{
    DriveStatus, EntryType, EnumToken, ExpenditureCategory, MoneyFor, TransactionNature,
    TransactionStatus, TransactionType, UnknownToken, UserType,
};
pub use expenditure::{
    Expenditure, ExpenditureFilter, ExpenditureStats, ExpenditureUpdate, NewExpenditure,
};
pub use record_id::RecordId;
pub use transaction::{
    NewTransaction, StatusChange, Transaction, TransactionFilter, TransactionStats,
    TransactionUpdate,
};
