//! Accounting store collaborator.
//!
//! The audit only needs overflow jobs that ended with the target exit code
//! inside the report window. This module defines that contract
//! ([`AccountingStore`]), the record it yields, and a JSON file backend.
//!
//! Components:
//! - `types`: job records, filter criteria and the report window.
//! - `store_trait`: the `AccountingStore` trait.
//! - `file_store`: backend reading exported accounting rows from a JSON file.

pub mod file_store;
pub mod store_trait;
pub mod types;

pub use file_store::FileAccountingStore;
pub use store_trait::AccountingStore;
pub use types::{AccountingFilter, AccountingJobRecord, ReportWindow};
