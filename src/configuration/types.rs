use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::accounting::{AccountingFilter, ReportWindow};
use crate::log_parsing::TimeBasis;
use crate::matching::{HostLookupChain, HostLookupStrategy, MatchWindow};

/// Where the xrootd logs live and how their timestamps read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub log_directory: PathBuf,
    /// Substring a file name must contain to be ingested.
    pub file_marker: String,
    pub time_basis: TimeBasis,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            log_directory: PathBuf::from("/var/log/xrootd"),
            file_marker: String::from("xrootd.log"),
            time_basis: TimeBasis::Local,
        }
    }
}

/// Which accounting records are audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountingConfig {
    pub records_path: PathBuf,
    pub exit_code: i32,
    pub resource_type: String,
    pub overflow_only: bool,
    /// Hour (UTC) at which the daily report window closes.
    pub cutoff_hour: u32,
    /// Explicit window; both bounds or neither.
    pub earliest_end: Option<DateTime<Utc>>,
    pub latest_end: Option<DateTime<Utc>>,
}

impl Default for AccountingConfig {
    fn default() -> Self {
        let filter = AccountingFilter::default();
        Self {
            records_path: PathBuf::from("accounting.json"),
            exit_code: filter.exit_code,
            resource_type: filter.resource_type,
            overflow_only: filter.overflow_only,
            cutoff_hour: 14,
            earliest_end: None,
            latest_end: None,
        }
    }
}

impl AccountingConfig {
    pub fn filter(&self) -> AccountingFilter {
        AccountingFilter {
            exit_code: self.exit_code,
            resource_type: self.resource_type.clone(),
            overflow_only: self.overflow_only,
        }
    }

    /// The explicit window if configured, otherwise the daily window ending
    /// on `today` at the cutoff hour.
    pub fn report_window(&self, today: NaiveDate) -> Option<ReportWindow> {
        match (self.earliest_end, self.latest_end) {
            (Some(earliest), Some(latest)) => Some(ReportWindow::new(earliest, latest)),
            _ => ReportWindow::daily_ending(today, self.cutoff_hour),
        }
    }
}

/// Tuning of the correlation heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub tolerance_secs: i64,
    pub open_session_grace_secs: i64,
    pub host_lookup: Vec<HostLookupStrategy>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let window = MatchWindow::default();
        Self {
            tolerance_secs: window.tolerance_secs,
            open_session_grace_secs: window.open_session_grace_secs,
            host_lookup: HostLookupChain::default().strategies().to_vec(),
        }
    }
}

impl MatchingConfig {
    pub fn window(&self) -> MatchWindow {
        MatchWindow {
            tolerance_secs: self.tolerance_secs,
            open_session_grace_secs: self.open_session_grace_secs,
        }
    }

    pub fn lookup_chain(&self) -> HostLookupChain {
        HostLookupChain::new(self.host_lookup.clone())
    }
}
