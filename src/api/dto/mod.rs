//! Data Transfer Objects for REST request/response serialization.
//!
//! Query DTOs keep raw strings and convert them into domain filters with
//! `to_filter`, so malformed values surface as 400 responses instead of
//! extractor rejections.

pub mod common_dto;
pub mod drive_dto;
pub mod expenditure_dto;
pub mod export_dto;
pub mod import_dto;
pub mod transaction_dto;

pub use common_dto::*;
pub use drive_dto::*;
pub use expenditure_dto::*;
pub use export_dto::*;
pub use import_dto::*;
pub use transaction_dto::*;
