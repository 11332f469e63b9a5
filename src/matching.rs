//! Correlation of accounting jobs with xrootd sessions.
//!
//! For every failed overflow job the matcher finds the sessions that logged in
//! from the job's worker node and keeps those whose login and disconnect fall
//! just after the job's start and end.
//!
//! Components:
//! - `host_lookup`: ordered strategies mapping an accounting host to an index key.
//! - `job_matcher`: the time-window heuristic.
//! - `types`: match results, job descriptors and counters.

pub mod host_lookup;
pub mod job_matcher;
pub mod types;

pub use host_lookup::{HostLookupChain, HostLookupStrategy};
pub use job_matcher::{JobMatcher, MatchWindow};
pub use types::{JobDescriptor, MatchResult, MatchStats};
