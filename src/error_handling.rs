//! Error types shared by every subsystem of the audit run.
//!
//! Data-quality problems (malformed log lines, missing session fields, hosts
//! without index hits) never surface here; they are absorbed where they occur.
//! Everything in this module is fatal for the run.

pub mod types;

pub use types::*;
