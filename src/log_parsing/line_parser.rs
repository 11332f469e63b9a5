use log::trace;
use regex::{Captures, Regex};

use crate::error_handling::types::IngestError;

use super::timestamp::TimeBasis;
use super::types::LogEvent;

const LOGIN_PATTERN: &str =
    r"^(\d{2})(\d{2})(\d{2}) (\d{2}):(\d{2}):(\d{2}) \d+ XrootdXeq: (\S+) login";
const DISCONNECT_PATTERN: &str =
    r"^(\d{2})(\d{2})(\d{2}) (\d{1,2}):(\d{2}):(\d{2}) \d+ XrootdXeq: (\S+) disc \d{1,2}:\d{2}:\d{2}$";
const REDIRECT_PATTERN: &str =
    r"^\d{6} \d{1,2}:\d{2}:\d{2} \d+ Decode xrootd redirects (\S+) to (\S+) (\S+)$";

/// The line shapes the parser knows, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape {
    Login,
    Disconnect,
    Redirect,
}

impl LineShape {
    pub const ORDER: [LineShape; 3] = [LineShape::Login, LineShape::Disconnect, LineShape::Redirect];
}

/// Dispatches raw xrootd log lines to typed events.
///
/// The three shapes are tried in [`LineShape::ORDER`]; the first one that
/// matches decides the outcome even if it then rejects the line (for instance
/// on an impossible date).
pub struct LineParser {
    login: Regex,
    disconnect: Regex,
    redirect: Regex,
    time_basis: TimeBasis,
}

impl LineParser {
    pub fn new(time_basis: TimeBasis) -> Result<Self, IngestError> {
        Ok(Self {
            login: Regex::new(LOGIN_PATTERN)?,
            disconnect: Regex::new(DISCONNECT_PATTERN)?,
            redirect: Regex::new(REDIRECT_PATTERN)?,
            time_basis,
        })
    }

    pub fn time_basis(&self) -> TimeBasis {
        self.time_basis
    }

    /// Parses one line. Unknown or malformed lines give `None`.
    pub fn parse_line(&self, line: &str) -> Option<LogEvent> {
        let line = line.trim_end_matches(['\r', '\n']);
        for shape in LineShape::ORDER {
            let regex = self.regex_for(shape);
            if let Some(caps) = regex.captures(line) {
                let event = self.build_event(shape, &caps);
                if event.is_none() {
                    trace!("{:?} line rejected: {}", shape, line);
                }
                return event;
            }
        }
        None
    }

    fn regex_for(&self, shape: LineShape) -> &Regex {
        match shape {
            LineShape::Login => &self.login,
            LineShape::Disconnect => &self.disconnect,
            LineShape::Redirect => &self.redirect,
        }
    }

    fn build_event(&self, shape: LineShape, caps: &Captures<'_>) -> Option<LogEvent> {
        match shape {
            LineShape::Login => {
                let timestamp = self.timestamp(caps)?;
                let job_id = caps.get(7)?.as_str();
                let hostname = hostname_of(job_id)?;
                Some(LogEvent::Login {
                    job_id: job_id.to_string(),
                    hostname: hostname.to_string(),
                    timestamp,
                })
            }
            LineShape::Disconnect => {
                let timestamp = self.timestamp(caps)?;
                Some(LogEvent::Disconnect {
                    job_id: caps.get(7)?.as_str().to_string(),
                    timestamp,
                })
            }
            LineShape::Redirect => Some(LogEvent::Redirect {
                job_id: caps.get(1)?.as_str().to_string(),
                redirection_site: caps.get(2)?.as_str().to_string(),
                target_path: caps.get(3)?.as_str().to_string(),
            }),
        }
    }

    /// Groups 1-6 hold YY MM DD hh mm ss.
    fn timestamp(&self, caps: &Captures<'_>) -> Option<i64> {
        let field = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };
        self.time_basis.epoch_from_fields(
            field(1)?,
            field(2)?,
            field(3)?,
            field(4)?,
            field(5)?,
            field(6)?,
        )
    }
}

/// Host part of a `user@host` job identifier: the text between the first `@`
/// and the next one, if any.
pub fn hostname_of(job_id: &str) -> Option<&str> {
    let (_, rest) = job_id.split_once('@')?;
    let host = rest.split('@').next().unwrap_or(rest);
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}
