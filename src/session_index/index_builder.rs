use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, error, info};

use crate::error_handling::types::IngestError;
use crate::log_parsing::{LineParser, LogEvent};

use super::corpus::LogCorpus;
use super::session_record::SessionRecord;

/// Counters describing what an ingest pass saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub files: usize,
    pub lines: usize,
    pub logins: usize,
    pub disconnects: usize,
    pub redirects: usize,
    pub ignored: usize,
}

/// Read-only view of every session seen in the corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIndex {
    sessions: HashMap<String, SessionRecord>,
    hostnames: HashMap<String, Vec<String>>,
    stats: IngestStats,
}

impl SessionIndex {
    pub fn session(&self, job_id: &str) -> Option<&SessionRecord> {
        self.sessions.get(job_id)
    }

    /// Job identifiers that logged in from `hostname`, in arrival order.
    /// A job that logged in several times appears several times.
    pub fn jobs_for_host(&self, hostname: &str) -> &[String] {
        self.hostnames
            .get(hostname)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn host_count(&self) -> usize {
        self.hostnames.len()
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }
}

/// Accumulates log events into a [`SessionIndex`].
///
/// Files may be fed in any order; only the relative order of events for the
/// same job identifier affects the result (last write wins per field).
pub struct SessionIndexBuilder {
    parser: LineParser,
    index: SessionIndex,
}

impl SessionIndexBuilder {
    pub fn new(parser: LineParser) -> Self {
        Self {
            parser,
            index: SessionIndex::default(),
        }
    }

    pub fn apply(&mut self, event: LogEvent) {
        let index = &mut self.index;
        match event {
            LogEvent::Login {
                job_id,
                hostname,
                timestamp,
            } => {
                index.stats.logins += 1;
                index.sessions.entry(job_id.clone()).or_default().login_time = Some(timestamp);
                index.hostnames.entry(hostname).or_default().push(job_id);
            }
            LogEvent::Disconnect { job_id, timestamp } => {
                index.stats.disconnects += 1;
                index.sessions.entry(job_id).or_default().disconnect_time = Some(timestamp);
            }
            LogEvent::Redirect {
                job_id,
                target_path,
                redirection_site,
            } => {
                index.stats.redirects += 1;
                let record = index.sessions.entry(job_id).or_default();
                record.target_path = Some(target_path);
                record.redirection_site = Some(redirection_site);
            }
        }
    }

    pub fn ingest_line(&mut self, line: &str) {
        self.index.stats.lines += 1;
        match self.parser.parse_line(line) {
            Some(event) => self.apply(event),
            None => self.index.stats.ignored += 1,
        }
    }

    /// Feeds every line of `reader`. Bytes that are not UTF-8 are replaced
    /// rather than rejected.
    pub fn ingest_reader<R: BufRead>(&mut self, mut reader: R) -> io::Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            self.ingest_line(&line);
        }
        Ok(())
    }

    pub fn ingest_file(&mut self, path: &Path) -> Result<(), IngestError> {
        let file = File::open(path).map_err(|e| {
            error!("Failed to open log file {}: {}", path.display(), e);
            IngestError::FileUnreadable(path.to_path_buf(), e)
        })?;
        let before = self.index.stats.lines;
        self.ingest_reader(BufReader::new(file)).map_err(|e| {
            error!("Failed to read log file {}: {}", path.display(), e);
            IngestError::FileUnreadable(path.to_path_buf(), e)
        })?;
        self.index.stats.files += 1;
        debug!(
            "Ingested {} line(s) from {}",
            self.index.stats.lines - before,
            path.display()
        );
        Ok(())
    }

    pub fn ingest_corpus(&mut self, corpus: &LogCorpus) -> Result<(), IngestError> {
        for path in corpus.files() {
            self.ingest_file(path)?;
        }
        Ok(())
    }

    /// Closes ingestion and hands out the read-only index.
    pub fn finish(self) -> SessionIndex {
        let stats = self.index.stats;
        info!(
            "Session index built: {} session(s) on {} host(s) from {} file(s); {} login, {} disc, {} redirect, {} ignored of {} line(s) (time basis {})",
            self.index.session_count(),
            self.index.host_count(),
            stats.files,
            stats.logins,
            stats.disconnects,
            stats.redirects,
            stats.ignored,
            stats.lines,
            self.parser.time_basis()
        );
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_parsing::TimeBasis;
    use std::fs;
    use tempfile::TempDir;

    const CORPUS: &str = "\
120405 20:03:15 6063 XrootdXeq: 114717.0@cmssrv32.fnal.gov login
120405 20:03:16 6063 Decode xrootd redirects 114717.0@cmssrv32.fnal.gov to cmssrv32.fnal.gov /store/a.root
some unrelated line
120405 20:13:20 6063 XrootdXeq: 114717.0@cmssrv32.fnal.gov disc 0:10:05
";

    fn builder() -> SessionIndexBuilder {
        SessionIndexBuilder::new(LineParser::new(TimeBasis::Utc).unwrap())
    }

    fn build(text: &str) -> SessionIndex {
        let mut b = builder();
        b.ingest_reader(text.as_bytes()).unwrap();
        b.finish()
    }

    #[test]
    fn test_builds_session_and_host_index() {
        let index = build(CORPUS);
        let record = index.session("114717.0@cmssrv32.fnal.gov").unwrap();
        assert_eq!(record.login_time, Some(1_333_656_195));
        assert_eq!(record.disconnect_time, Some(1_333_656_800));
        assert_eq!(record.target_path.as_deref(), Some("/store/a.root"));
        assert_eq!(record.redirection_site.as_deref(), Some("cmssrv32.fnal.gov"));
        assert_eq!(
            index.jobs_for_host("cmssrv32.fnal.gov"),
            ["114717.0@cmssrv32.fnal.gov".to_string()]
        );

        let stats = index.stats();
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.logins, 1);
        assert_eq!(stats.disconnects, 1);
        assert_eq!(stats.redirects, 1);
        assert_eq!(stats.ignored, 1);
    }

    #[test]
    fn test_last_login_wins_and_host_list_keeps_duplicates() {
        let index = build(
            "120405 20:03:15 1 XrootdXeq: j@h login\n120405 20:05:00 1 XrootdXeq: j@h login\n",
        );
        let record = index.session("j@h").unwrap();
        assert_eq!(record.login_time, Some(1_333_656_300));
        assert_eq!(index.jobs_for_host("h").len(), 2);
    }

    #[test]
    fn test_events_without_login_create_records() {
        let index = build(
            "120405 20:13:20 1 XrootdXeq: j@h disc 0:00:01\n120405 20:13:21 1 Decode xrootd redirects k@h to s /p\n",
        );
        assert_eq!(index.session("j@h").unwrap().login_time, None);
        assert_eq!(index.session("k@h").unwrap().target_path.as_deref(), Some("/p"));
        assert!(index.jobs_for_host("h").is_empty());
    }

    #[test]
    fn test_rebuilding_same_corpus_gives_same_state() {
        assert_eq!(build(CORPUS), build(CORPUS));
    }

    #[test]
    fn test_feeding_corpus_twice_keeps_session_fields() {
        let once = build(CORPUS);

        let mut b = builder();
        b.ingest_reader(CORPUS.as_bytes()).unwrap();
        b.ingest_reader(CORPUS.as_bytes()).unwrap();
        let twice = b.finish();

        let job = "114717.0@cmssrv32.fnal.gov";
        assert_eq!(once.session(job), twice.session(job));
        assert_eq!(twice.jobs_for_host("cmssrv32.fnal.gov").len(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut bytes = b"\xff\xfe junk\n".to_vec();
        bytes.extend_from_slice(b"120405 20:03:15 1 XrootdXeq: j@h login\n");
        let mut b = builder();
        b.ingest_reader(bytes.as_slice()).unwrap();
        let index = b.finish();
        assert_eq!(index.stats().ignored, 1);
        assert!(index.session("j@h").is_some());
    }

    #[test]
    fn test_ingest_corpus_from_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("xrootd.log.1"),
            "120405 20:03:15 1 XrootdXeq: j@h login\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("xrootd.log.2"),
            "120405 20:13:20 1 XrootdXeq: j@h disc 0:10:05\n",
        )
        .unwrap();
        let corpus = LogCorpus::discover(dir.path(), "xrootd.log").unwrap();

        let mut b = builder();
        b.ingest_corpus(&corpus).unwrap();
        let index = b.finish();
        assert_eq!(index.stats().files, 2);
        let record = index.session("j@h").unwrap();
        assert!(record.login_time.is_some());
        assert!(record.disconnect_time.is_some());
    }
}
