//! Grouping of matches by redirection site and user, and the plain-text report.

pub mod report_builder;

pub use report_builder::ReportIndex;
