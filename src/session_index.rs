//! Session index built from the xrootd log corpus.
//!
//! The index holds one [`SessionRecord`] per job identifier and a hostname →
//! job-id list used by the matcher to find candidate sessions for a worker
//! node. It is produced by [`SessionIndexBuilder`], which must be finished
//! before any matching starts; after that the index is read-only.

pub mod corpus;
pub mod index_builder;
pub mod session_record;

pub use corpus::LogCorpus;
pub use index_builder::{IngestStats, SessionIndex, SessionIndexBuilder};
pub use session_record::SessionRecord;
