use serde::{Deserialize, Serialize};

/// One recognised xrootd log line.
///
/// Timestamps are epoch seconds, already normalised through the configured
/// [`TimeBasis`](super::TimeBasis).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEvent {
    /// A client session was opened on `hostname`.
    Login {
        job_id: String,
        hostname: String,
        timestamp: i64,
    },
    /// A client session was closed.
    Disconnect { job_id: String, timestamp: i64 },
    /// The redirector sent the session's read of `target_path` to another site.
    Redirect {
        job_id: String,
        target_path: String,
        redirection_site: String,
    },
}

impl LogEvent {
    pub fn job_id(&self) -> &str {
        match self {
            LogEvent::Login { job_id, .. }
            | LogEvent::Disconnect { job_id, .. }
            | LogEvent::Redirect { job_id, .. } => job_id,
        }
    }
}
