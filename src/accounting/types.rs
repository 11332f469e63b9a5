use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One batch job as reported by the accounting store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingJobRecord {
    pub internal_job_id: String,
    pub user_identity: String,
    /// Worker host; may hold several space-separated tokens.
    pub host_string: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl AccountingJobRecord {
    /// First whitespace-separated token of the host string.
    pub fn primary_host(&self) -> Option<&str> {
        self.host_string.split_whitespace().next()
    }
}

/// Which jobs count as failed overflow jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingFilter {
    pub exit_code: i32,
    pub resource_type: String,
    pub overflow_only: bool,
}

impl Default for AccountingFilter {
    fn default() -> Self {
        Self {
            exit_code: 84,
            resource_type: String::from("BatchPilot"),
            overflow_only: true,
        }
    }
}

/// Half-open `[earliest_end, latest_end)` range on job end times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub earliest_end: DateTime<Utc>,
    pub latest_end: DateTime<Utc>,
}

impl ReportWindow {
    pub fn new(earliest_end: DateTime<Utc>, latest_end: DateTime<Utc>) -> Self {
        Self {
            earliest_end,
            latest_end,
        }
    }

    /// The 24 hours ending on `day` at `cutoff_hour`:00:00 UTC.
    pub fn daily_ending(day: NaiveDate, cutoff_hour: u32) -> Option<Self> {
        let latest_end = day.and_hms_opt(cutoff_hour, 0, 0)?.and_utc();
        Some(Self {
            earliest_end: latest_end - Duration::days(1),
            latest_end,
        })
    }

    pub fn contains(&self, end_time: DateTime<Utc>) -> bool {
        end_time >= self.earliest_end && end_time < self.latest_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(host: &str) -> AccountingJobRecord {
        AccountingJobRecord {
            internal_job_id: "1.0".into(),
            user_identity: "/CN=someone".into(),
            host_string: host.into(),
            start_time: Utc.with_ymd_and_hms(2012, 4, 5, 20, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2012, 4, 5, 21, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_primary_host() {
        assert_eq!(record("node1.unl.edu extra tokens").primary_host(), Some("node1.unl.edu"));
        assert_eq!(record("node1").primary_host(), Some("node1"));
        assert_eq!(record("   ").primary_host(), None);
    }

    #[test]
    fn test_daily_window() {
        let day = NaiveDate::from_ymd_opt(2012, 4, 6).unwrap();
        let window = ReportWindow::daily_ending(day, 14).unwrap();
        assert_eq!(window.earliest_end, Utc.with_ymd_and_hms(2012, 4, 5, 14, 0, 0).unwrap());
        assert_eq!(window.latest_end, Utc.with_ymd_and_hms(2012, 4, 6, 14, 0, 0).unwrap());
        assert!(window.contains(window.earliest_end));
        assert!(!window.contains(window.latest_end));
        assert!(ReportWindow::daily_ending(day, 24).is_none());
    }
}
