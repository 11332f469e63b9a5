use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::session_index::SessionIndex;

/// One way of turning an accounting host into a hostname index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostLookupStrategy {
    /// The host as reported.
    Exact,
    /// The host with a trailing `:<port>` removed.
    WithoutPort,
    /// Everything before the first `.`.
    ShortName,
}

impl HostLookupStrategy {
    /// Index key to try, or `None` when the strategy does not change `host`.
    pub fn key<'h>(&self, host: &'h str) -> Option<&'h str> {
        match self {
            HostLookupStrategy::Exact => Some(host),
            HostLookupStrategy::WithoutPort => {
                let (name, port) = host.rsplit_once(':')?;
                if !name.is_empty()
                    && !port.is_empty()
                    && port.bytes().all(|b| b.is_ascii_digit())
                {
                    Some(name)
                } else {
                    None
                }
            }
            HostLookupStrategy::ShortName => {
                let (short, _) = host.split_once('.')?;
                Some(short)
            }
        }
    }
}

impl FromStr for HostLookupStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "exact" => Ok(HostLookupStrategy::Exact),
            "without_port" => Ok(HostLookupStrategy::WithoutPort),
            "short_name" => Ok(HostLookupStrategy::ShortName),
            other => Err(format!("unknown host lookup strategy {:?}", other)),
        }
    }
}

impl fmt::Display for HostLookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostLookupStrategy::Exact => write!(f, "exact"),
            HostLookupStrategy::WithoutPort => write!(f, "without_port"),
            HostLookupStrategy::ShortName => write!(f, "short_name"),
        }
    }
}

/// Strategies tried in order; the first one with a non-empty hit wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLookupChain {
    strategies: Vec<HostLookupStrategy>,
}

impl Default for HostLookupChain {
    fn default() -> Self {
        Self::new(vec![
            HostLookupStrategy::Exact,
            HostLookupStrategy::WithoutPort,
            HostLookupStrategy::ShortName,
        ])
    }
}

impl HostLookupChain {
    pub fn new(strategies: Vec<HostLookupStrategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[HostLookupStrategy] {
        &self.strategies
    }

    /// Candidate job identifiers for `host` and the strategy that found them.
    pub fn resolve<'i>(
        &self,
        host: &str,
        index: &'i SessionIndex,
    ) -> Option<(HostLookupStrategy, &'i [String])> {
        self.strategies.iter().find_map(|strategy| {
            let jobs = index.jobs_for_host(strategy.key(host)?);
            if jobs.is_empty() {
                None
            } else {
                Some((*strategy, jobs))
            }
        })
    }
}
