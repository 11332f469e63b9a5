use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::accounting::{AccountingStore, FileAccountingStore, ReportWindow};
use crate::configuration::config::Config;
use crate::error_handling::types::*;
use crate::log_parsing::LineParser;
use crate::matching::{JobMatcher, MatchStats};
use crate::report::ReportIndex;
use crate::session_index::{IngestStats, LogCorpus, SessionIndex, SessionIndexBuilder};

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub report: ReportIndex,
    pub window: ReportWindow,
    pub ingest: IngestStats,
    pub matching: MatchStats,
}

pub struct Controller {
    config: Config,
    store: Box<dyn AccountingStore>,
}

impl Controller {
    /// Controller reading accounting rows from the configured records file.
    pub fn new(config: Config) -> Self {
        let store = FileAccountingStore::new(&config.accounting.records_path);
        info!("Reading accounting rows from {}", store.path().display());
        Self::with_store(config, Box::new(store))
    }

    pub fn with_store(config: Config, store: Box<dyn AccountingStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&self) -> Result<AuditOutcome, ControllerError> {
        self.run_at(Utc::now())
    }

    /// Runs the audit as if the clock read `now`. `now` picks the daily report
    /// window and stands in for the disconnect of sessions still open.
    pub fn run_at(&self, now: DateTime<Utc>) -> Result<AuditOutcome, ControllerError> {
        let window = self
            .config
            .accounting
            .report_window(now.date_naive())
            .ok_or_else(|| {
                ConfigError::NotInRange(format!(
                    "cutoff hour {} gives no report window",
                    self.config.accounting.cutoff_hour
                ))
            })?;

        let index = self.build_index()?;

        let filter = self.config.accounting.filter();
        let records = self.store.fetch_overflow_jobs(&filter, &window)?;
        info!("Matching {} accounting record(s)", records.len());

        let mut matcher = JobMatcher::new(
            &index,
            self.config.matching.lookup_chain(),
            self.config.matching.window(),
            now.timestamp(),
        );
        let mut report = ReportIndex::new();
        for record in &records {
            report.extend(matcher.match_record(record));
        }

        let matching = matcher.stats();
        info!(
            "Matched {} session(s) for {} record(s): {} without host, {} without host hit, {} outside window; {} site(s) in report",
            matching.matches,
            matching.records,
            matching.without_host,
            matching.no_host_hit,
            matching.no_window_hit,
            report.site_count()
        );

        Ok(AuditOutcome {
            report,
            window,
            ingest: index.stats(),
            matching,
        })
    }

    fn build_index(&self) -> Result<SessionIndex, IngestError> {
        let corpus_config = &self.config.corpus;
        let corpus = LogCorpus::discover(&corpus_config.log_directory, &corpus_config.file_marker)?;
        if corpus.is_empty() {
            debug!("No log files in {}", corpus.directory().display());
        }
        let mut builder = SessionIndexBuilder::new(LineParser::new(corpus_config.time_basis)?);
        builder.ingest_corpus(&corpus)?;
        Ok(builder.finish())
    }
}
