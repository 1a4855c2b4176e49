//! Persistence layer: record store and file storage collaborators.
//!
//! The services only see the traits defined here. [`PostgresStore`] is the
//! production implementation backed by `sqlx::PgPool`; [`InMemoryStore`]
//! serves tests and `PERSISTENCE_ENABLED=false` and follows the same
//! semantics (per-call atomic multi-create, unique transaction references).

pub mod files;
pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{
    Certificate, DirectoryFilter, DonationRequest, Drive, DriveFilter, Expenditure,
    ExpenditureFilter, NewCertificate, NewDonationRequest, NewDrive, NewExpenditure,
    NewTransaction, RecordId, Transaction, TransactionFilter, UserSummary,
};
use crate::error::AdminError;

pub use files::{FileStore, LocalFileStore};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

/// Transactional multi-create: either every record of the call is stored
/// or none is.
#[async_trait]
pub trait CreateMany<N, R>: Send + Sync
where
    N: Send + 'static,
{
    /// Stores all records in one transaction and returns them with their
    /// primary keys, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] if any record is rejected; no
    /// record of this call is stored in that case.
    async fn create_many(&self, records: Vec<N>) -> Result<Vec<R>, AdminError>;
}

/// One page of a listing, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl PageRequest {
    /// Rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Stored transactions.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Page of matching transactions, newest value date first.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, AdminError>;

    /// Number of matching transactions.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn count_transactions(&self, filter: &TransactionFilter) -> Result<u64, AdminError>;

    /// Every matching transaction, newest value date first.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn all_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, AdminError>;

    /// Fetches one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn get_transaction(&self, id: RecordId) -> Result<Option<Transaction>, AdminError>;

    /// Replaces a stored transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] if the id is unknown and
    /// [`AdminError::Persistence`] if the reference collides with another
    /// record.
    async fn save_transaction(&self, tx: &Transaction) -> Result<(), AdminError>;

    /// Hard-deletes a transaction. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn delete_transaction(&self, id: RecordId) -> Result<bool, AdminError>;
}

/// Stored drives.
#[async_trait]
pub trait DriveRepository: Send + Sync {
    /// Matching drives, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn list_drives(&self, filter: &DriveFilter) -> Result<Vec<Drive>, AdminError>;

    /// Fetches one drive.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn get_drive(&self, id: RecordId) -> Result<Option<Drive>, AdminError>;

    /// Replaces a stored drive.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] if the id is unknown.
    async fn save_drive(&self, drive: &Drive) -> Result<(), AdminError>;

    /// Hard-deletes a drive. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn delete_drive(&self, id: RecordId) -> Result<bool, AdminError>;
}

/// Stored expenditures.
#[async_trait]
pub trait ExpenditureRepository: Send + Sync {
    /// Matching expenditures, newest date first.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn list_expenditures(
        &self,
        filter: &ExpenditureFilter,
    ) -> Result<Vec<Expenditure>, AdminError>;

    /// Fetches one expenditure.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn get_expenditure(&self, id: RecordId) -> Result<Option<Expenditure>, AdminError>;

    /// Replaces a stored expenditure.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] if the id is unknown.
    async fn save_expenditure(&self, exp: &Expenditure) -> Result<(), AdminError>;

    /// Hard-deletes an expenditure. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn delete_expenditure(&self, id: RecordId) -> Result<bool, AdminError>;
}

/// Donation requests and registered users, read for the admin export.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Matching donation requests, in the given creation-time order.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn list_donation_requests(
        &self,
        filter: &DirectoryFilter,
        newest_first: bool,
    ) -> Result<Vec<DonationRequest>, AdminError>;

    /// Matching users, in the given creation-time order.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    async fn list_users(
        &self,
        filter: &DirectoryFilter,
        newest_first: bool,
    ) -> Result<Vec<UserSummary>, AdminError>;
}

/// Everything the services need from storage.
pub trait RecordStore:
    TransactionRepository
    + DriveRepository
    + ExpenditureRepository
    + DirectoryRepository
    + CreateMany<NewTransaction, Transaction>
    + CreateMany<NewDrive, Drive>
    + CreateMany<NewCertificate, Certificate>
    + CreateMany<NewDonationRequest, DonationRequest>
    + CreateMany<NewExpenditure, Expenditure>
    + fmt::Debug
{
}

impl<T> RecordStore for T where
    T: TransactionRepository
        + DriveRepository
        + ExpenditureRepository
        + DirectoryRepository
        + CreateMany<NewTransaction, Transaction>
        + CreateMany<NewDrive, Drive>
        + CreateMany<NewCertificate, Certificate>
        + CreateMany<NewDonationRequest, DonationRequest>
        + CreateMany<NewExpenditure, Expenditure>
        + fmt::Debug
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offset_is_zero_based() {
        assert_eq!(PageRequest { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(PageRequest { page: 3, limit: 25 }.offset(), 50);
        assert_eq!(PageRequest { page: 0, limit: 10 }.offset(), 0);
    }
}
