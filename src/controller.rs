//! Orchestration of one audit run.
//!
//! The [`Controller`] runs the phases in a fixed order: ingest the whole log
//! corpus, fetch accounting records, match, then hand back the grouped report.
//! Any I/O failure aborts the run before a report exists.

pub mod controller_handler;

pub use controller_handler::{AuditOutcome, Controller};
