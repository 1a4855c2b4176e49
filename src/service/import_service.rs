//! Import service: runs the validate → transform → batch-import pipeline
//! for any [`ImportRecord`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AdminError;
use crate::export::{ExportFile, ExportFormat, Table};
use crate::import::csv::parse_csv;
use crate::import::{
    BatchImporter, DefaultedField, ImportRecord, ImportTemplate, RawRow, TransformContext,
    validate_rows,
};
use crate::persistence::{CreateMany, RecordStore};

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Entity-specific success message.
    pub message: &'static str,
    /// Records stored.
    pub count: usize,
    /// Forgiving-default notices, one per injected value.
    pub warnings: Vec<String>,
}

/// Formats the notice for a value that was replaced by a default.
fn default_warning(row: usize, defaulted: &DefaultedField) -> String {
    format!(
        "Row {}: {} '{}' not recognised; defaulted to {}",
        row + 1,
        defaulted.field,
        defaulted.raw,
        defaulted.value
    )
}

/// Bulk import orchestration shared by every entry form.
#[derive(Debug, Clone)]
pub struct ImportService {
    store: Arc<dyn RecordStore>,
    importer: BatchImporter,
}

impl ImportService {
    /// Creates a new `ImportService`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, importer: BatchImporter) -> Self {
        Self { store, importer }
    }

    /// Validates every row, then transforms and stores them in batches.
    ///
    /// Nothing is stored unless every row is valid.
    ///
    /// # Errors
    ///
    /// - [`AdminError::EmptyImport`] when `rows` is empty.
    /// - [`AdminError::Validation`] with every violation of every row.
    /// - [`AdminError::PartialImport`] when a batch is rejected by the store.
    pub async fn import<N, R>(&self, rows: Vec<RawRow>) -> Result<ImportSummary, AdminError>
    where
        N: ImportRecord,
        R: Send + 'static,
        dyn RecordStore: CreateMany<N, R>,
    {
        if rows.is_empty() {
            return Err(AdminError::EmptyImport(N::ENTITY));
        }

        let report = validate_rows::<N>(&rows);
        if !report.is_valid() {
            warn!(
                entity = N::ENTITY,
                rows = rows.len(),
                invalid_rows = report.invalid_rows(),
                "import rejected by validation"
            );
            return Err(AdminError::Validation(report));
        }

        let ctx = TransformContext::now();
        let mut warnings = Vec::new();
        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let transformed = N::transform(row, &ctx);
            for defaulted in &transformed.defaults {
                let notice = default_warning(index, defaulted);
                warn!(entity = N::ENTITY, "{notice}");
                warnings.push(notice);
            }
            records.push(transformed.record);
        }

        let outcome = self
            .importer
            .import::<N, R, dyn RecordStore>(self.store.as_ref(), records)
            .await?;
        info!(
            entity = N::ENTITY,
            count = outcome.count(),
            batches = outcome.batches,
            warnings = warnings.len(),
            "import completed"
        );

        Ok(ImportSummary {
            message: N::SUCCESS_MESSAGE,
            count: outcome.count(),
            warnings,
        })
    }

    /// Parses CSV text and imports its rows.
    ///
    /// # Errors
    ///
    /// [`AdminError::MalformedCsv`] if the text cannot be parsed, otherwise
    /// as [`ImportService::import`].
    pub async fn import_csv<N, R>(&self, text: &str) -> Result<ImportSummary, AdminError>
    where
        N: ImportRecord,
        R: Send + 'static,
        dyn RecordStore: CreateMany<N, R>,
    {
        let rows = parse_csv(text)?;
        self.import::<N, R>(rows).await
    }

    /// Field description of the import form.
    #[must_use]
    pub fn template<N: ImportRecord>() -> ImportTemplate {
        N::schema().template()
    }

    /// Downloadable CSV template: one header line and one example row.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Export`] if the CSV writer fails.
    pub fn template_csv<N: ImportRecord>() -> Result<ExportFile, AdminError> {
        let (headers, example) = N::schema().template_rows();
        let mut table = Table::new(N::ENTITY, headers);
        table.push_row(example);
        let stem = format!("{}_template", N::ENTITY.replace(' ', "_"));
        table.into_file(&stem, ExportFormat::Csv)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Certificate, NewCertificate, NewTransaction, Transaction};
    use crate::persistence::InMemoryStore;

    fn service(batch_size: usize) -> (Arc<InMemoryStore>, ImportService) {
        let store = Arc::new(InMemoryStore::new());
        let dyn_store: Arc<dyn RecordStore> = Arc::clone(&store) as Arc<dyn RecordStore>;
        (store, ImportService::new(dyn_store, BatchImporter::new(batch_size)))
    }

    fn certificate_row(email: &str) -> RawRow {
        [
            ("donationId*", "DON-1"),
            ("email*", email),
            ("type*", "80G"),
            ("fullname*", "Asha Patil"),
            ("mobile*", "9876543210"),
        ]
        .into_iter()
        .collect()
    }

    fn transaction_row(reference: &str, kind: &str) -> RawRow {
        [
            ("name*", "John Doe"),
            ("email*", "john@example.com"),
            ("phone*", "9876543210"),
            ("userType*", "INDIVIDUAL"),
            ("amount*", "500"),
            ("type*", kind),
            ("transactionId*", reference),
            ("date (DD-MM-YYYY)*", "15-01-2025"),
            ("transactionNature*", "CREDIT"),
            ("entryType*", "MANUAL"),
            ("entryBy*", "admin"),
            ("moneyFor*", "FOOD"),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let (_, svc) = service(100);
        let result = svc.import::<NewCertificate, Certificate>(Vec::new()).await;
        let Err(err) = result else {
            panic!("expected error");
        };
        assert_eq!(err.to_string(), "No certificate data provided");
    }

    #[tokio::test]
    async fn invalid_row_stores_nothing() {
        let (store, svc) = service(100);
        let rows = vec![
            certificate_row("a@example.com"),
            certificate_row("not-an-email"),
            certificate_row("c@example.com"),
        ];
        let result = svc.import::<NewCertificate, Certificate>(rows).await;
        let Err(AdminError::Validation(report)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(report.invalid_rows(), 1);
        assert_eq!(report.row(1), Some(&["Invalid email format".to_string()][..]));
        assert_eq!(store.certificate_count().await, 0);
    }

    #[tokio::test]
    async fn valid_rows_are_stored_in_batches() {
        let (store, svc) = service(2);
        let rows = (0..5)
            .map(|i| certificate_row(&format!("donor{i}@example.com")))
            .collect();
        let Ok(summary) = svc.import::<NewCertificate, Certificate>(rows).await else {
            panic!("import must succeed");
        };
        assert_eq!(summary.count, 5);
        assert_eq!(summary.message, "Certificates imported successfully");
        assert_eq!(store.certificate_count().await, 5);
    }

    #[tokio::test]
    async fn injected_defaults_become_warnings() {
        let (_, svc) = service(100);
        let rows = vec![transaction_row("REF-1", "UPI"), transaction_row("REF-2", "paytm")];
        let Ok(summary) = svc.import::<NewTransaction, Transaction>(rows).await else {
            panic!("import must succeed");
        };
        assert_eq!(
            summary.warnings,
            vec!["Row 2: type 'paytm' not recognised; defaulted to CASH".to_string()]
        );
    }

    #[tokio::test]
    async fn duplicate_reference_in_second_batch_reports_committed() {
        let (_, svc) = service(2);
        let rows = vec![
            transaction_row("REF-1", "UPI"),
            transaction_row("REF-2", "UPI"),
            transaction_row("REF-1", "UPI"),
        ];
        let result = svc.import::<NewTransaction, Transaction>(rows).await;
        let Err(AdminError::PartialImport { committed, .. }) = result else {
            panic!("expected partial import");
        };
        assert_eq!(committed, 2);
    }

    #[tokio::test]
    async fn csv_text_goes_through_the_same_pipeline() {
        let (store, svc) = service(100);
        let text = "donationId*,email*,type*,fullname*,mobile*\n\
                    DON-1,a@example.com,80G,Asha,9876543210\n";
        let Ok(summary) = svc.import_csv::<NewCertificate, Certificate>(text).await else {
            panic!("csv import must succeed");
        };
        assert_eq!(summary.count, 1);
        assert_eq!(store.certificate_count().await, 1);
    }

    #[test]
    fn csv_template_lists_required_headers_first() {
        let Ok(file) = ImportService::template_csv::<NewCertificate>() else {
            panic!("template must render");
        };
        assert_eq!(file.file_name, "certificate_template.csv");
        let Ok(text) = String::from_utf8(file.bytes) else {
            panic!("utf-8");
        };
        let header = text.trim_start_matches('\u{feff}').lines().next().unwrap_or_default();
        assert!(header.starts_with("donationId*,email*"));
    }
}
