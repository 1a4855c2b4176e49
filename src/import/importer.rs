//! Batch importer: writes validated records in fixed-size, independently
//! committed batches.

use tracing::{info, warn};

use super::DEFAULT_BATCH_SIZE;
use crate::error::AdminError;
use crate::persistence::CreateMany;

/// Result of a fully committed import.
#[derive(Debug, Clone)]
pub struct ImportOutcome<R> {
    /// Stored records in input order.
    pub records: Vec<R>,
    /// Number of batches written.
    pub batches: usize,
}

impl<R> ImportOutcome<R> {
    /// Number of stored records.
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

/// Splits records into batches of `batch_size` and hands each one to the
/// store as its own transaction.
#[derive(Debug, Clone, Copy)]
pub struct BatchImporter {
    batch_size: usize,
}

impl Default for BatchImporter {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl BatchImporter {
    /// Importer writing `batch_size` records per transaction (at least 1).
    #[must_use]
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Configured batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Writes `records` batch by batch, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::PartialImport`] carrying the number of records
    /// committed by earlier batches when a batch is rejected. Those records
    /// stay stored.
    pub async fn import<N, R, S>(
        &self,
        store: &S,
        records: Vec<N>,
    ) -> Result<ImportOutcome<R>, AdminError>
    where
        N: Send + 'static,
        S: CreateMany<N, R> + ?Sized,
    {
        let total = records.len();
        let mut stored = Vec::with_capacity(total);
        let mut batches = 0;
        let mut remaining = records.into_iter();

        loop {
            let batch: Vec<N> = remaining.by_ref().take(self.batch_size).collect();
            if batch.is_empty() {
                break;
            }
            let size = batch.len();
            match store.create_many(batch).await {
                Ok(created) => {
                    batches += 1;
                    stored.extend(created);
                    info!(batch = batches, size, committed = stored.len(), total, "batch committed");
                }
                Err(err) => {
                    warn!(
                        batch = batches + 1,
                        committed = stored.len(),
                        error = %err,
                        "batch rejected, import aborted"
                    );
                    return Err(AdminError::PartialImport {
                        committed: stored.len(),
                        message: err.to_string(),
                    });
                }
            }
        }

        Ok(ImportOutcome {
            records: stored,
            batches,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Records batch sizes and fails the batch with the given 1-based number.
    #[derive(Debug, Default)]
    struct RecordingSink {
        sizes: Mutex<Vec<usize>>,
        fail_on: Option<usize>,
    }

    #[async_trait]
    impl CreateMany<u32, u32> for RecordingSink {
        async fn create_many(&self, records: Vec<u32>) -> Result<Vec<u32>, AdminError> {
            let Ok(mut sizes) = self.sizes.lock() else {
                panic!("poisoned");
            };
            sizes.push(records.len());
            if self.fail_on == Some(sizes.len()) {
                return Err(AdminError::Persistence("unique violation".to_string()));
            }
            Ok(records)
        }
    }

    fn sizes(sink: &RecordingSink) -> Vec<usize> {
        let Ok(sizes) = sink.sizes.lock() else {
            panic!("poisoned");
        };
        sizes.clone()
    }

    #[tokio::test]
    async fn splits_into_batches_of_one_hundred() {
        let sink = RecordingSink::default();
        let Ok(outcome) = BatchImporter::default().import(&sink, (0..250).collect::<Vec<u32>>()).await else {
            panic!("import must succeed");
        };
        assert_eq!(outcome.count(), 250);
        assert_eq!(outcome.batches, 3);
        assert_eq!(sizes(&sink), vec![100, 100, 50]);
        assert_eq!(outcome.records.get(249), Some(&249));
    }

    #[tokio::test]
    async fn exact_multiple_has_no_trailing_empty_batch() {
        let sink = RecordingSink::default();
        let Ok(outcome) = BatchImporter::new(50).import(&sink, (0..100).collect::<Vec<u32>>()).await else {
            panic!("import must succeed");
        };
        assert_eq!(outcome.batches, 2);
        assert_eq!(sizes(&sink), vec![50, 50]);
    }

    #[tokio::test]
    async fn failing_batch_reports_committed_count() {
        let sink = RecordingSink {
            fail_on: Some(2),
            ..RecordingSink::default()
        };
        let result = BatchImporter::default().import(&sink, (0..250).collect::<Vec<u32>>()).await;
        let Err(AdminError::PartialImport { committed, message }) = result else {
            panic!("expected partial import");
        };
        assert_eq!(committed, 100);
        assert!(message.contains("unique violation"));
        // Third batch is never attempted.
        assert_eq!(sizes(&sink), vec![100, 100]);
    }

    #[tokio::test]
    async fn empty_input_writes_nothing() {
        let sink = RecordingSink::default();
        let Ok(outcome) = BatchImporter::default().import(&sink, Vec::<u32>::new()).await else {
            panic!("import must succeed");
        };
        assert_eq!(outcome.count(), 0);
        assert!(sizes(&sink).is_empty());
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        assert_eq!(BatchImporter::new(0).batch_size(), 1);
    }
}
