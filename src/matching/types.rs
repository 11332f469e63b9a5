use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rendered in place of a redirection site or path the log never reported.
pub const MISSING_FIELD: &str = "None";

const GMT_FORMAT: &str = "%Y-%m-%d %H:%M:%S GMT";

/// The job half of a match, as shown under its site and user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub internal_job_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub target_path: Option<String>,
}

impl fmt::Display for JobDescriptor {
    /// `<id>, <start> GMT--<end> GMT, ` then a newline and ten spaces before
    /// the path.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}--{}, \n          {}",
            self.internal_job_id,
            self.start_time.format(GMT_FORMAT),
            self.end_time.format(GMT_FORMAT),
            self.target_path.as_deref().unwrap_or(MISSING_FIELD)
        )
    }
}

/// One accounting job linked to one xrootd session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub redirection_site: String,
    pub user_identity: String,
    pub job_descriptor: JobDescriptor,
}

/// Counters describing a matching pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub records: usize,
    pub without_host: usize,
    pub no_host_hit: usize,
    pub no_window_hit: usize,
    pub matches: usize,
}
