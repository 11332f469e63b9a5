use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::matching::MatchResult;

/// Matches grouped as site → users and (site, user) → rendered job lines.
///
/// Job lines are deduplicated on their exact rendered text, so two sessions
/// that produce the same line collapse into one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportIndex {
    site_users: BTreeMap<String, BTreeSet<String>>,
    site_user_jobs: BTreeMap<(String, String), BTreeSet<String>>,
}

impl ReportIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: MatchResult) {
        let MatchResult {
            redirection_site,
            user_identity,
            job_descriptor,
        } = result;
        self.site_users
            .entry(redirection_site.clone())
            .or_default()
            .insert(user_identity.clone());
        self.site_user_jobs
            .entry((redirection_site, user_identity))
            .or_default()
            .insert(job_descriptor.to_string());
    }

    pub fn extend<I: IntoIterator<Item = MatchResult>>(&mut self, results: I) {
        for result in results {
            self.record(result);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.site_users.is_empty()
    }

    pub fn site_count(&self) -> usize {
        self.site_users.len()
    }

    /// Number of distinct job lines across every site and user.
    pub fn job_line_count(&self) -> usize {
        self.site_user_jobs.values().map(BTreeSet::len).sum()
    }

    pub fn users_for_site(&self, site: &str) -> Option<&BTreeSet<String>> {
        self.site_users.get(site)
    }

    /// The report body; empty when nothing matched.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// The report body under the heading naming the audited exit code.
    pub fn render_with_heading(&self, exit_code: i32) -> String {
        format!(
            "Possible Overflow Jobs with Exit Code {} based on xrootd log\n\n{}",
            exit_code,
            self.render()
        )
    }
}

impl fmt::Display for ReportIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (site, users) in &self.site_users {
            writeln!(f, "for {}:", site)?;
            for user in users {
                writeln!(f, "    for {}:", user)?;
                let key = (site.clone(), user.clone());
                for job in self.site_user_jobs.get(&key).into_iter().flatten() {
                    writeln!(f, "        {}", job)?;
                }
            }
        }
        Ok(())
    }
}
