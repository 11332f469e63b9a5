pub mod accounting;
pub mod configuration;
pub mod controller;
pub mod error_handling;
pub mod log_parsing;
pub mod matching;
pub mod report;
pub mod session_index;

pub use accounting::{AccountingJobRecord, AccountingStore, FileAccountingStore};
pub use configuration::Config;
pub use controller::{AuditOutcome, Controller};
pub use log_parsing::{LineParser, LogEvent, TimeBasis};
pub use matching::{HostLookupChain, HostLookupStrategy, JobMatcher, MatchResult, MatchWindow};
pub use report::ReportIndex;
pub use session_index::{LogCorpus, SessionIndex, SessionIndexBuilder, SessionRecord};
