use serde::{Deserialize, Serialize};

/// What the log corpus says about one job identifier.
///
/// Every field is filled independently by whichever event carries it; a later
/// event of the same kind overwrites the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub login_time: Option<i64>,
    pub disconnect_time: Option<i64>,
    pub target_path: Option<String>,
    pub redirection_site: Option<String>,
}

impl SessionRecord {
    /// Login time, or epoch 0 when the login line was never seen.
    pub fn login_or_epoch(&self) -> i64 {
        self.login_time.unwrap_or(0)
    }

    /// Disconnect time, or `now + grace_secs` for a session still open.
    pub fn disconnect_or_open(&self, now: i64, grace_secs: i64) -> i64 {
        self.disconnect_time
            .unwrap_or_else(|| now.saturating_add(grace_secs))
    }

    pub fn is_open(&self) -> bool {
        self.disconnect_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        let record = SessionRecord::default();
        assert_eq!(record.login_or_epoch(), 0);
        assert_eq!(record.disconnect_or_open(1_000, 100), 1_100);
        assert!(record.is_open());

        let closed = SessionRecord {
            login_time: Some(10),
            disconnect_time: Some(20),
            ..Default::default()
        };
        assert_eq!(closed.login_or_epoch(), 10);
        assert_eq!(closed.disconnect_or_open(1_000, 100), 20);
        assert!(!closed.is_open());
    }

    #[test]
    fn test_huge_grace_saturates() {
        let record = SessionRecord::default();
        assert_eq!(record.disconnect_or_open(1_000, i64::MAX), i64::MAX);
    }
}
