use std::collections::HashSet;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::accounting::AccountingJobRecord;
use crate::session_index::{SessionIndex, SessionRecord};

use super::host_lookup::HostLookupChain;
use super::types::{JobDescriptor, MatchResult, MatchStats, MISSING_FIELD};

/// Tolerances of the time-window heuristic, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchWindow {
    /// How far after the job's start (end) the session's login (disconnect)
    /// may lie. Earlier is never accepted.
    pub tolerance_secs: i64,
    /// Added to "now" to stand in for the disconnect of a session still open.
    pub open_session_grace_secs: i64,
}

impl Default for MatchWindow {
    fn default() -> Self {
        Self {
            tolerance_secs: 600,
            open_session_grace_secs: 100,
        }
    }
}

impl MatchWindow {
    fn within(&self, instant: i64, anchor: i64) -> bool {
        instant >= anchor && instant <= anchor.saturating_add(self.tolerance_secs)
    }

    /// Whether `session` plausibly belongs to a job running `[begin, end]`.
    pub fn accepts(&self, session: &SessionRecord, begin: i64, end: i64, now: i64) -> bool {
        let login = session.login_or_epoch();
        let disconnect = session.disconnect_or_open(now, self.open_session_grace_secs);
        self.within(login, begin) && self.within(disconnect, end)
    }
}

/// Links accounting jobs to sessions of a finished [`SessionIndex`].
pub struct JobMatcher<'a> {
    index: &'a SessionIndex,
    lookup: HostLookupChain,
    window: MatchWindow,
    now: i64,
    stats: MatchStats,
}

impl<'a> JobMatcher<'a> {
    /// `now` is the epoch second used for the open-session sentinel; it stays
    /// fixed for the whole pass.
    pub fn new(index: &'a SessionIndex, lookup: HostLookupChain, window: MatchWindow, now: i64) -> Self {
        Self {
            index,
            lookup,
            window,
            now,
            stats: MatchStats::default(),
        }
    }

    pub fn stats(&self) -> MatchStats {
        self.stats
    }

    /// Every session accepted for `record`. An empty result is not an error.
    pub fn match_record(&mut self, record: &AccountingJobRecord) -> Vec<MatchResult> {
        self.stats.records += 1;

        let Some(host) = record.primary_host() else {
            self.stats.without_host += 1;
            debug!("Job {} has an empty host", record.internal_job_id);
            return Vec::new();
        };
        let Some((strategy, candidates)) = self.lookup.resolve(host, self.index) else {
            self.stats.no_host_hit += 1;
            debug!("Job {}: no session on host {}", record.internal_job_id, host);
            return Vec::new();
        };
        trace!(
            "Job {}: {} candidate(s) on {} via {}",
            record.internal_job_id,
            candidates.len(),
            host,
            strategy
        );

        let begin = record.start_time.timestamp();
        let end = record.end_time.timestamp();
        let mut seen = HashSet::new();
        let mut results = Vec::new();
        for job_id in candidates {
            if !seen.insert(job_id.as_str()) {
                continue;
            }
            let Some(session) = self.index.session(job_id) else {
                continue;
            };
            if !self.window.accepts(session, begin, end, self.now) {
                continue;
            }
            if session.is_open() {
                debug!(
                    "Job {} matched session {} still open at {}",
                    record.internal_job_id, job_id, self.now
                );
            } else {
                debug!("Job {} matched session {}", record.internal_job_id, job_id);
            }
            results.push(MatchResult {
                redirection_site: session
                    .redirection_site
                    .clone()
                    .unwrap_or_else(|| MISSING_FIELD.to_string()),
                user_identity: record.user_identity.clone(),
                job_descriptor: JobDescriptor {
                    internal_job_id: record.internal_job_id.clone(),
                    start_time: record.start_time,
                    end_time: record.end_time,
                    target_path: session.target_path.clone(),
                },
            });
        }

        if results.is_empty() {
            self.stats.no_window_hit += 1;
        }
        self.stats.matches += results.len();
        results
    }
}
