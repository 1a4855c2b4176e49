//! Expenditure service.

use std::slice;
use std::sync::Arc;

use crate::domain::{
    Expenditure, ExpenditureFilter, ExpenditureStats, ExpenditureUpdate, NewExpenditure, RecordId,
};
use crate::error::AdminError;
use crate::import::{ImportRecord, RawRow, TransformContext, ValidationReport, validate_rows};
use crate::persistence::{CreateMany, RecordStore};

/// Expenditure administration.
#[derive(Debug, Clone)]
pub struct ExpenditureService {
    store: Arc<dyn RecordStore>,
}

fn invalid(messages: Vec<String>) -> AdminError {
    let mut report = ValidationReport::default();
    for message in messages {
        report.push(0, message);
    }
    AdminError::Validation(report)
}

impl ExpenditureService {
    /// Creates a new `ExpenditureService`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Matching expenditures, newest date first.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    pub async fn list(&self, filter: &ExpenditureFilter) -> Result<Vec<Expenditure>, AdminError> {
        self.store.list_expenditures(filter).await
    }

    /// Creates one expenditure from form fields.
    ///
    /// # Errors
    ///
    /// - [`AdminError::Validation`] keyed by row `0` when a field is invalid
    ///   or `customCategory` is missing for OTHER.
    /// - [`AdminError::Persistence`] on storage failure.
    pub async fn create(&self, row: RawRow) -> Result<Expenditure, AdminError> {
        let report = validate_rows::<NewExpenditure>(slice::from_ref(&row));
        if !report.is_valid() {
            return Err(AdminError::Validation(report));
        }
        let record = NewExpenditure::transform(&row, &TransformContext::now()).record;
        let violations = record.violations();
        if !violations.is_empty() {
            return Err(invalid(violations));
        }

        let created = CreateMany::<NewExpenditure, Expenditure>::create_many(
            self.store.as_ref(),
            vec![record],
        )
        .await?;
        let exp = created
            .into_iter()
            .next()
            .ok_or_else(|| AdminError::Internal("store returned no expenditure".to_string()))?;
        tracing::info!(id = %exp.id, category = %exp.category, amount = exp.amount, "expenditure created");
        Ok(exp)
    }

    /// Fetches one expenditure.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] if the id is unknown.
    pub async fn get(&self, id: RecordId) -> Result<Expenditure, AdminError> {
        self.store
            .get_expenditure(id)
            .await?
            .ok_or_else(|| AdminError::not_found("expenditure", id))
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// - [`AdminError::NotFound`] if the id is unknown.
    /// - [`AdminError::Validation`] listing every broken invariant.
    pub async fn update(
        &self,
        id: RecordId,
        update: ExpenditureUpdate,
    ) -> Result<Expenditure, AdminError> {
        let mut exp = self.get(id).await?;
        exp.apply_update(update).map_err(invalid)?;
        self.store.save_expenditure(&exp).await?;
        tracing::info!(%id, "expenditure updated");
        Ok(exp)
    }

    /// Hard-deletes an expenditure.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotFound`] if the id is unknown.
    pub async fn delete(&self, id: RecordId) -> Result<(), AdminError> {
        if !self.store.delete_expenditure(id).await? {
            return Err(AdminError::not_found("expenditure", id));
        }
        tracing::info!(%id, "expenditure deleted");
        Ok(())
    }

    /// Total and per-category sums over the matching expenditures.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Persistence`] on storage failure.
    pub async fn stats(&self, filter: &ExpenditureFilter) -> Result<ExpenditureStats, AdminError> {
        let all = self.store.list_expenditures(filter).await?;
        let mut stats = ExpenditureStats::default();
        for exp in &all {
            stats.record(exp);
        }
        Ok(stats)
    }
}
