//! Log event parsing for xrootd redirector logs.
//!
//! Turns raw log lines into typed [`LogEvent`] values. Parsing is best-effort:
//! a line that does not match one of the known shapes yields `None` and is
//! dropped by the caller.
//!
//! Submodules:
//! - `types`: the [`LogEvent`] union.
//! - `line_parser`: the three line shapes and the dispatcher trying them in order.
//! - `timestamp`: conversion of the log's wall-clock encoding into epoch seconds.

pub mod line_parser;
pub mod timestamp;
pub mod types;

pub use line_parser::{LineParser, LineShape};
pub use timestamp::TimeBasis;
pub use types::LogEvent;
