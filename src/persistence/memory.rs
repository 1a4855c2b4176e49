//! In-process record store.
//!
//! Backed by `tokio::sync::RwLock`-guarded maps. Each `create_many` call
//! validates the whole batch under one write lock before inserting
//! anything, which gives the same all-or-nothing behaviour as a database
//! transaction.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    CreateMany, DirectoryRepository, DriveRepository, ExpenditureRepository, PageRequest,
    TransactionRepository,
};
use crate::domain::{
    Certificate, DirectoryFilter, DonationRequest, Drive, DriveFilter, Expenditure,
    ExpenditureFilter, NewCertificate, NewDonationRequest, NewDrive, NewExpenditure,
    NewTransaction, RecordId, Transaction, TransactionFilter, UserSummary,
};
use crate::error::AdminError;

#[derive(Debug, Default)]
struct Tables {
    transactions: HashMap<RecordId, Transaction>,
    drives: HashMap<RecordId, Drive>,
    expenditures: HashMap<RecordId, Expenditure>,
    certificates: HashMap<RecordId, Certificate>,
    donation_requests: HashMap<RecordId, DonationRequest>,
    users: HashMap<RecordId, UserSummary>,
}

/// Record store kept entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

fn duplicate_reference(reference: &str) -> AdminError {
    AdminError::Persistence(format!(
        "duplicate transaction id: {reference} already exists"
    ))
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers users; the admin panel only reads them.
    pub async fn seed_users(&self, users: impl IntoIterator<Item = UserSummary>) {
        let mut tables = self.tables.write().await;
        for user in users {
            tables.users.insert(user.id, user);
        }
    }

    /// Number of stored certificates.
    pub async fn certificate_count(&self) -> usize {
        self.tables.read().await.certificates.len()
    }
}

fn sorted_transactions<'a>(
    rows: impl Iterator<Item = &'a Transaction>,
    filter: &TransactionFilter,
) -> Vec<Transaction> {
    let mut out: Vec<Transaction> = rows.filter(|tx| filter.matches(tx)).cloned().collect();
    out.sort_by_key(|tx| Reverse((tx.date, tx.entry_at)));
    out
}

#[async_trait]
impl CreateMany<NewTransaction, Transaction> for InMemoryStore {
    async fn create_many(
        &self,
        records: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, AdminError> {
        let mut tables = self.tables.write().await;
        let mut seen: HashSet<&str> = tables
            .transactions
            .values()
            .map(|tx| tx.transaction_id.as_str())
            .collect();
        for record in &records {
            if !seen.insert(record.transaction_id.as_str()) {
                return Err(duplicate_reference(&record.transaction_id));
            }
        }
        drop(seen);

        let created: Vec<Transaction> = records
            .into_iter()
            .map(|record| record.into_record(RecordId::new()))
            .collect();
        for tx in &created {
            tables.transactions.insert(tx.id, tx.clone());
        }
        Ok(created)
    }
}

#[async_trait]
impl TransactionRepository for InMemoryStore {
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<Vec<Transaction>, AdminError> {
        let tables = self.tables.read().await;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit).unwrap_or(usize::MAX);
        Ok(sorted_transactions(tables.transactions.values(), filter)
            .into_iter()
            .skip(skip)
            .take(take)
            .collect())
    }

    async fn count_transactions(&self, filter: &TransactionFilter) -> Result<u64, AdminError> {
        let tables = self.tables.read().await;
        let count = tables
            .transactions
            .values()
            .filter(|tx| filter.matches(tx))
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn all_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, AdminError> {
        let tables = self.tables.read().await;
        Ok(sorted_transactions(tables.transactions.values(), filter))
    }

    async fn get_transaction(&self, id: RecordId) -> Result<Option<Transaction>, AdminError> {
        Ok(self.tables.read().await.transactions.get(&id).cloned())
    }

    async fn save_transaction(&self, tx: &Transaction) -> Result<(), AdminError> {
        let mut tables = self.tables.write().await;
        if !tables.transactions.contains_key(&tx.id) {
            return Err(AdminError::not_found("transaction", tx.id));
        }
        let collides = tables
            .transactions
            .values()
            .any(|other| other.id != tx.id && other.transaction_id == tx.transaction_id);
        if collides {
            return Err(duplicate_reference(&tx.transaction_id));
        }
        tables.transactions.insert(tx.id, tx.clone());
        Ok(())
    }

    async fn delete_transaction(&self, id: RecordId) -> Result<bool, AdminError> {
        Ok(self.tables.write().await.transactions.remove(&id).is_some())
    }
}

#[async_trait]
impl CreateMany<NewDrive, Drive> for InMemoryStore {
    async fn create_many(&self, records: Vec<NewDrive>) -> Result<Vec<Drive>, AdminError> {
        let mut tables = self.tables.write().await;
        let created: Vec<Drive> = records
            .into_iter()
            .map(|record| record.into_record(RecordId::new()))
            .collect();
        for drive in &created {
            tables.drives.insert(drive.id, drive.clone());
        }
        Ok(created)
    }
}

#[async_trait]
impl DriveRepository for InMemoryStore {
    async fn list_drives(&self, filter: &DriveFilter) -> Result<Vec<Drive>, AdminError> {
        let tables = self.tables.read().await;
        let mut out: Vec<Drive> = tables
            .drives
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        out.sort_by_key(|d| Reverse(d.created_at));
        Ok(out)
    }

    async fn get_drive(&self, id: RecordId) -> Result<Option<Drive>, AdminError> {
        Ok(self.tables.read().await.drives.get(&id).cloned())
    }

    async fn save_drive(&self, drive: &Drive) -> Result<(), AdminError> {
        let mut tables = self.tables.write().await;
        match tables.drives.get_mut(&drive.id) {
            Some(slot) => {
                *slot = drive.clone();
                Ok(())
            }
            None => Err(AdminError::not_found("drive", drive.id)),
        }
    }

    async fn delete_drive(&self, id: RecordId) -> Result<bool, AdminError> {
        Ok(self.tables.write().await.drives.remove(&id).is_some())
    }
}

#[async_trait]
impl CreateMany<NewExpenditure, Expenditure> for InMemoryStore {
    async fn create_many(
        &self,
        records: Vec<NewExpenditure>,
    ) -> Result<Vec<Expenditure>, AdminError> {
        let mut tables = self.tables.write().await;
        let created: Vec<Expenditure> = records
            .into_iter()
            .map(|record| record.into_record(RecordId::new()))
            .collect();
        for exp in &created {
            tables.expenditures.insert(exp.id, exp.clone());
        }
        Ok(created)
    }
}

#[async_trait]
impl ExpenditureRepository for InMemoryStore {
    async fn list_expenditures(
        &self,
        filter: &ExpenditureFilter,
    ) -> Result<Vec<Expenditure>, AdminError> {
        let tables = self.tables.read().await;
        let mut out: Vec<Expenditure> = tables
            .expenditures
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        out.sort_by_key(|e| Reverse((e.date, e.created_at)));
        Ok(out)
    }

    async fn get_expenditure(&self, id: RecordId) -> Result<Option<Expenditure>, AdminError> {
        Ok(self.tables.read().await.expenditures.get(&id).cloned())
    }

    async fn save_expenditure(&self, exp: &Expenditure) -> Result<(), AdminError> {
        let mut tables = self.tables.write().await;
        match tables.expenditures.get_mut(&exp.id) {
            Some(slot) => {
                *slot = exp.clone();
                Ok(())
            }
            None => Err(AdminError::not_found("expenditure", exp.id)),
        }
    }

    async fn delete_expenditure(&self, id: RecordId) -> Result<bool, AdminError> {
        Ok(self.tables.write().await.expenditures.remove(&id).is_some())
    }
}

#[async_trait]
impl CreateMany<NewCertificate, Certificate> for InMemoryStore {
    async fn create_many(
        &self,
        records: Vec<NewCertificate>,
    ) -> Result<Vec<Certificate>, AdminError> {
        let mut tables = self.tables.write().await;
        let created: Vec<Certificate> = records
            .into_iter()
            .map(|record| record.into_record(RecordId::new()))
            .collect();
        for cert in &created {
            tables.certificates.insert(cert.id, cert.clone());
        }
        Ok(created)
    }
}

#[async_trait]
impl CreateMany<NewDonationRequest, DonationRequest> for InMemoryStore {
    async fn create_many(
        &self,
        records: Vec<NewDonationRequest>,
    ) -> Result<Vec<DonationRequest>, AdminError> {
        let mut tables = self.tables.write().await;
        let created: Vec<DonationRequest> = records
            .into_iter()
            .map(|record| record.into_record(RecordId::new()))
            .collect();
        for req in &created {
            tables.donation_requests.insert(req.id, req.clone());
        }
        Ok(created)
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryStore {
    async fn list_donation_requests(
        &self,
        filter: &DirectoryFilter,
        newest_first: bool,
    ) -> Result<Vec<DonationRequest>, AdminError> {
        let tables = self.tables.read().await;
        let mut out: Vec<DonationRequest> = tables
            .donation_requests
            .values()
            .filter(|r| filter.matches_request(r))
            .cloned()
            .collect();
        out.sort_by_key(|r| r.created_at);
        if newest_first {
            out.reverse();
        }
        Ok(out)
    }

    async fn list_users(
        &self,
        filter: &DirectoryFilter,
        newest_first: bool,
    ) -> Result<Vec<UserSummary>, AdminError> {
        let tables = self.tables.read().await;
        let mut out: Vec<UserSummary> = tables
            .users
            .values()
            .filter(|u| filter.matches_user(u))
            .cloned()
            .collect();
        out.sort_by_key(|u| u.created_at);
        if newest_first {
            out.reverse();
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::transaction::tests::sample;

    fn new_tx(reference: &str) -> NewTransaction {
        let tx = sample(reference);
        NewTransaction {
            transaction_id: tx.transaction_id,
            name: tx.name,
            email: tx.email,
            phone: tx.phone,
            user_type: tx.user_type,
            amount: tx.amount,
            transaction_type: tx.transaction_type,
            transaction_nature: tx.transaction_nature,
            date: tx.date,
            money_for: tx.money_for,
            custom_money_for: tx.custom_money_for,
            entry_type: tx.entry_type,
            entry_by: tx.entry_by,
            entry_at: tx.entry_at,
            status: tx.status,
            status_description: tx.status_description,
            verified_by: tx.verified_by,
            verified_at: tx.verified_at,
            description: tx.description,
            screenshot_path: tx.screenshot_path,
            user_id: tx.user_id,
            organization_id: tx.organization_id,
        }
    }

    #[tokio::test]
    async fn batch_with_duplicate_reference_stores_nothing() {
        let store = InMemoryStore::new();
        let result = store
            .create_many(vec![new_tx("A"), new_tx("B"), new_tx("A")])
            .await;
        assert!(matches!(result, Err(AdminError::Persistence(_))));
        let count = store
            .count_transactions(&TransactionFilter::default())
            .await;
        assert!(matches!(count, Ok(0)));
    }

    #[tokio::test]
    async fn reference_must_be_unique_across_batches() {
        let store = InMemoryStore::new();
        let first: Result<Vec<Transaction>, _> = store.create_many(vec![new_tx("A")]).await;
        assert!(first.is_ok());
        let second: Result<Vec<Transaction>, _> = store.create_many(vec![new_tx("A")]).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn pagination_slices_sorted_results() {
        let store = InMemoryStore::new();
        let batch: Vec<NewTransaction> = (0..25).map(|i| new_tx(&format!("T{i}"))).collect();
        let Ok(_) = store.create_many(batch).await else {
            panic!("insert failed");
        };
        let page = PageRequest { page: 3, limit: 10 };
        let Ok(rows) = store
            .list_transactions(&TransactionFilter::default(), page)
            .await
        else {
            panic!("list failed");
        };
        assert_eq!(rows.len(), 5);
    }

    #[tokio::test]
    async fn save_unknown_drive_is_not_found() {
        let store = InMemoryStore::new();
        let drive = crate::domain::drive::tests::sample();
        let result = store.save_drive(&drive).await;
        assert!(matches!(result, Err(AdminError::NotFound { .. })));
    }
}
