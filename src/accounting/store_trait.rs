//! Accounting Store Trait
//!
//! Backends return jobs already narrowed to the failure class under audit, so
//! the matcher never sees a record it should not report on.

use crate::accounting::types::{AccountingFilter, AccountingJobRecord, ReportWindow};
use crate::error_handling::types::AccountingError;

/// Source of accounting records for one audit run.
pub trait AccountingStore {
    /// Jobs whose exit code, resource type and overflow flag satisfy `filter`
    /// and whose end time lies in `window`. Jobs without a usable host are
    /// left out.
    fn fetch_overflow_jobs(
        &self,
        filter: &AccountingFilter,
        window: &ReportWindow,
    ) -> Result<Vec<AccountingJobRecord>, AccountingError>;
}
