use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::accounting::store_trait::AccountingStore;
use crate::accounting::types::{AccountingFilter, AccountingJobRecord, ReportWindow};
use crate::error_handling::types::AccountingError;

/// One exported row of the accounting database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingRow {
    pub local_job_id: String,
    pub common_name: String,
    #[serde(default)]
    pub host: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub exit_code: i32,
    pub resource_type: String,
    #[serde(default)]
    pub overflow: bool,
}

impl AccountingRow {
    fn selected_by(&self, filter: &AccountingFilter, window: &ReportWindow) -> bool {
        self.exit_code == filter.exit_code
            && self.resource_type == filter.resource_type
            && (!filter.overflow_only || self.overflow)
            && window.contains(self.end_time)
    }

    /// Rows with no host, or the database's literal `NULL`, cannot be matched.
    fn usable_host(&self) -> Option<&str> {
        self.host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty() && *h != "NULL")
    }
}

/// Accounting backend reading a JSON array of [`AccountingRow`] values.
pub struct FileAccountingStore {
    path: PathBuf,
}

impl FileAccountingStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_rows(&self) -> Result<Vec<AccountingRow>, AccountingError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            error!("Failed to read accounting records {}: {}", self.path.display(), e);
            AccountingError::Unavailable(self.path.clone(), e)
        })?;
        serde_json::from_str(&content).map_err(|e| {
            error!("Invalid accounting records in {}: {}", self.path.display(), e);
            AccountingError::MalformedRecords(format!("{}: {}", self.path.display(), e))
        })
    }
}

impl AccountingStore for FileAccountingStore {
    fn fetch_overflow_jobs(
        &self,
        filter: &AccountingFilter,
        window: &ReportWindow,
    ) -> Result<Vec<AccountingJobRecord>, AccountingError> {
        let rows = self.load_rows()?;
        let total = rows.len();
        let mut records = Vec::new();
        for row in rows {
            if !row.selected_by(filter, window) {
                continue;
            }
            let Some(host) = row.usable_host() else {
                debug!("Skipping job {} without host", row.local_job_id);
                continue;
            };
            records.push(AccountingJobRecord {
                host_string: host.to_string(),
                internal_job_id: row.local_job_id,
                user_identity: row.common_name,
                start_time: row.start_time,
                end_time: row.end_time,
            });
        }
        info!(
            "Selected {} of {} accounting row(s) with exit code {} ending in [{}, {})",
            records.len(),
            total,
            filter.exit_code,
            window.earliest_end.to_rfc3339(),
            window.latest_end.to_rfc3339()
        );
        Ok(records)
    }
}
