//! REST endpoint handlers organized by resource.

pub mod drive;
pub mod expenditure;
pub mod export;
pub mod import;
pub mod system;
pub mod transaction;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(import::routes())
        .merge(transaction::routes())
        .merge(expenditure::routes())
        .merge(drive::routes())
        .merge(export::routes())
}
