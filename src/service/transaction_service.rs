//! Transaction service: single entry, listing, status workflow, stats and
//! export.

use std::slice;
use std::sync::Arc;

use chrono::Utc;
use futures_util::future::try_join;

use crate::domain::{
    NewTransaction, RecordId, StatusChange, Transaction, TransactionFilter, TransactionStats,
    TransactionUpdate,
};
use crate::error::AdminError;
use crate::export::{ExportFile, ExportFormat, transaction_table};
use crate::import::{ImportRecord, RawRow, TransformContext, validate_rows};
use crate::persistence::{CreateMany, FileStore, PageRequest, RecordStore};

/// An uploaded file attached to a request.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-side file name.
    pub file_name: String,
    /// File content.
    pub bytes: Vec<u8>,
}

/// One page of a listing plus the total match count.
#[derive(Debug, Clone)]
pub struct TransactionPage {
    /// Transactions on this page.
    pub items: Vec<Transaction>,
    /// Matches across all pages.
    pub total: u64,
}

/// Transaction administration.
///
/// Single entries go through the same schema checks as bulk imports, so a
/// form submission and a CSV row are held to identical rules.
#[derive(Debug, Clone)]
pub struct TransactionService {
    store: Arc<dyn RecordStore>,
    files: Arc<dyn FileStore>,
}

impl TransactionService {
    /// Creates a new `TransactionService`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, files: Arc<dyn FileStore>) -> Self {
        Self { store, files }
    }

    /// Creates one transaction from form fields and an optional screenshot.
    ///
    /// `entryType` defaults to `MANUAL`; a CASH transaction without a
    /// reference gets a generated one.
    ///
    /// # Errors
    ///
    /// - [`AdminError::Validation`] keyed by row `0` when a field is invalid.
    /// - [`AdminError::FileStorage`] when the screenshot cannot be written.
    /// - [`AdminError::Persistence`] when the reference is already taken. The
    ///   uploaded screenshot is deleted again in that case.
    pub async fn create(
        &self,
        mut row: RawRow,
        screenshot: Option<Upload>,
    ) -> Result<Transaction, AdminError> {
        let schema = NewTransaction::schema();
        if schema.value(&row, "entryType").is_none() {
            row.insert("entryType", "MANUAL");
        }

        let report = validate_rows::<NewTransaction>(slice::from_ref(&row));
        if !report.is_valid() {
            return Err(AdminError::Validation(report));
        }

        let transformed = NewTransaction::transform(&row, &TransformContext::now());
        for defaulted in &transformed.defaults {
            tracing::warn!(
                field = defaulted.field,
                raw = %defaulted.raw,
                value = defaulted.value,
                "default injected, verify"
            );
        }
        let mut record = transformed.record;

        if let Some(upload) = screenshot {
            let path = self.files.upload(&upload.file_name, upload.bytes).await?;
            record.screenshot_path = Some(path);
        }

        let screenshot_path = record.screenshot_path.clone();
        let created = match CreateMany::<NewTransaction, Transaction>::create_many(
            self.store.as_ref(),
            vec![record],
        )
        .await
        {
            Ok(created) => created,
            Err(err) => {
                if let Some(path) = screenshot_path
                    && let Err(cleanup) = self.files.remove(&path).await
                {
                    tracing::warn!(
                        path = %path,
                        error = %cleanup,
                        "orphaned screenshot left behind"
                    );
                }
                return Err(err);
            }
        };
        let tx = created
            .into_iter()
            .next()
            .ok_or_else(|| AdminError::Internal("store returned no transaction".to_string()))?;
        tracing::info!(id = %tx.id, reference = %tx.transaction_id, "transaction created");
        Ok(tx)
    }

    /// Fetches the count and the requested page concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    pub async fn list(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<TransactionPage, AdminError> {
        let (total, items) = try_join(
            self.store.count_transactions(filter),
            self.store.list_transactions(filter, page),
        )
        .await?;
        Ok(TransactionPage { items, total })
    }

    /// Fetches one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] if the id is unknown.
    pub async fn get(&self, id: RecordId) -> Result<Transaction, AdminError> {
        self.store
            .get_transaction(id)
            .await?
            .ok_or_else(|| AdminError::not_found("transaction", id))
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// - [`AdminError::NotFound`] if the id is unknown.
    /// - [`AdminError::InvalidRequest`] if the update breaks an invariant.
    pub async fn update(
        &self,
        id: RecordId,
        update: TransactionUpdate,
    ) -> Result<Transaction, AdminError> {
        let mut tx = self.get(id).await?;
        tx.apply_update(update, Utc::now())
            .map_err(AdminError::InvalidRequest)?;
        self.store.save_transaction(&tx).await?;
        tracing::info!(%id, status = %tx.status, "transaction updated");
        Ok(tx)
    }

    /// Moves a transaction through the verification workflow.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] if the id is unknown.
    pub async fn change_status(
        &self,
        id: RecordId,
        change: StatusChange,
    ) -> Result<Transaction, AdminError> {
        let mut tx = self.get(id).await?;
        tx.apply_status(change, Utc::now());
        self.store.save_transaction(&tx).await?;
        tracing::info!(%id, status = %tx.status, "transaction status changed");
        Ok(tx)
    }

    /// Hard-deletes a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] if the id is unknown.
    pub async fn delete(&self, id: RecordId) -> Result<(), AdminError> {
        if !self.store.delete_transaction(id).await? {
            return Err(AdminError::not_found("transaction", id));
        }
        tracing::info!(%id, "transaction deleted");
        Ok(())
    }

    /// Dashboard totals over the matching transactions.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    pub async fn stats(&self, filter: &TransactionFilter) -> Result<TransactionStats, AdminError> {
        let all = self.store.all_transactions(filter).await?;
        let mut stats = TransactionStats::default();
        for tx in &all {
            stats.record(tx);
        }
        Ok(stats)
    }

    /// Renders every matching transaction as a file.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] or [`AdminError::Export`].
    pub async fn export(
        &self,
        filter: &TransactionFilter,
        format: ExportFormat,
    ) -> Result<ExportFile, AdminError> {
        let all = self.store.all_transactions(filter).await?;
        tracing::info!(rows = all.len(), format = format.extension(), "transactions exported");
        transaction_table(&all).into_file("transactions", format)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{TransactionStatus, TransactionType};
    use crate::persistence::{InMemoryStore, LocalFileStore};

    fn service(upload_root: &std::path::Path) -> TransactionService {
        TransactionService::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(LocalFileStore::new(upload_root)),
        )
    }

    fn form(reference: &str) -> RawRow {
        [
            ("name", "Asha Patil"),
            ("email", "asha@example.com"),
            ("phone", "9876543210"),
            ("userType", "INDIVIDUAL"),
            ("amount", "1500"),
            ("type", "UPI"),
            ("transactionId", reference),
            ("date", "2025-02-01"),
            ("transactionNature", "CREDIT"),
            ("entryBy", "admin"),
            ("moneyFor", "EDUCATION"),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn create_defaults_entry_type_and_stores_screenshot() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let svc = service(dir.path());
        let upload = Upload {
            file_name: "slip.png".to_string(),
            bytes: vec![7; 4],
        };
        let Ok(tx) = svc.create(form("UPI-1"), Some(upload)).await else {
            panic!("create must succeed");
        };
        assert_eq!(tx.entry_type.as_str(), "MANUAL");
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert!(
            tx.screenshot_path
                .as_deref()
                .is_some_and(|p| p.starts_with("/transactions/"))
        );
    }

    #[tokio::test]
    async fn rejected_insert_removes_its_screenshot() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let svc = service(dir.path());
        let slip = || Upload {
            file_name: "slip.png".to_string(),
            bytes: vec![7; 4],
        };
        let Ok(first) = svc.create(form("UPI-1"), Some(slip())).await else {
            panic!("create must succeed");
        };
        let result = svc.create(form("UPI-1"), Some(slip())).await;
        assert!(matches!(result, Err(AdminError::Persistence(_))));

        let uploads = dir.path().join(LocalFileStore::TRANSACTIONS_DIR);
        let Ok(mut entries) = std::fs::read_dir(&uploads) else {
            panic!("upload dir");
        };
        let Some(Ok(only)) = entries.next() else {
            panic!("first screenshot must remain");
        };
        assert!(entries.next().is_none());
        let Some(kept) = first.screenshot_path else {
            panic!("first transaction has a screenshot");
        };
        assert!(kept.ends_with(&only.file_name().to_string_lossy().into_owned()));
    }

    #[tokio::test]
    async fn create_reports_errors_on_row_zero() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let mut row = form("UPI-1");
        row.insert("email", "broken");
        let result = service(dir.path()).create(row, None).await;
        let Err(AdminError::Validation(report)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(report.row(0), Some(&["Invalid email format".to_string()][..]));
    }

    #[tokio::test]
    async fn cash_without_reference_gets_generated_id() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let mut row = form("");
        row.insert("type", "CASH");
        let Ok(tx) = service(dir.path()).create(row, None).await else {
            panic!("create must succeed");
        };
        assert_eq!(tx.transaction_type, TransactionType::Cash);
        assert_eq!(tx.transaction_id.len(), 10);
    }

    #[tokio::test]
    async fn verify_then_reject_clears_verification() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let svc = service(dir.path());
        let Ok(tx) = svc.create(form("UPI-9"), None).await else {
            panic!("create must succeed");
        };
        let verify = StatusChange::Verify {
            verified_by: "treasurer".to_string(),
        };
        let Ok(verified) = svc.change_status(tx.id, verify).await else {
            panic!("verify must succeed");
        };
        assert_eq!(verified.status, TransactionStatus::Verified);
        assert!(verified.verified_at.is_some());

        let reject = StatusChange::Reject {
            reason: Some("bounced".to_string()),
        };
        let Ok(rejected) = svc.change_status(tx.id, reject).await else {
            panic!("reject must succeed");
        };
        assert_eq!(rejected.status, TransactionStatus::Rejected);
        assert_eq!(rejected.verified_by, None);
        assert_eq!(rejected.status_description.as_deref(), Some("bounced"));
    }

    #[tokio::test]
    async fn list_counts_and_pages_concurrently() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let svc = service(dir.path());
        for i in 0..3 {
            let Ok(_) = svc.create(form(&format!("UPI-{i}")), None).await else {
                panic!("create must succeed");
            };
        }
        let page = PageRequest { page: 2, limit: 2 };
        let Ok(result) = svc.list(&TransactionFilter::default(), page).await else {
            panic!("list must succeed");
        };
        assert_eq!(result.total, 3);
        assert_eq!(result.items.len(), 1);
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let result = service(dir.path()).delete(RecordId::new()).await;
        assert!(matches!(result, Err(AdminError::NotFound { .. })));
    }
}
