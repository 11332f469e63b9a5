//! Wall-clock to epoch conversion.
//!
//! xrootd writes `YYMMDD HH:MM:SS` in the redirector host's local time with no
//! zone marker. Which zone that is has to be stated in configuration; the
//! matcher compares the result against accounting timestamps that are already
//! in UTC, so a wrong basis shifts every session by the zone offset.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Zone in which log wall-clock times are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeBasis {
    /// Zone of the machine running the audit.
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl Default for TimeBasis {
    fn default() -> Self {
        TimeBasis::Local
    }
}

impl TimeBasis {
    /// Converts a naive wall-clock time to epoch seconds.
    ///
    /// Returns `None` for times that do not exist in the zone (DST gaps). For
    /// ambiguous times the earlier instant is used.
    pub fn to_epoch(&self, wall: NaiveDateTime) -> Option<i64> {
        match self {
            TimeBasis::Local => Local
                .from_local_datetime(&wall)
                .earliest()
                .map(|dt| dt.timestamp()),
            TimeBasis::Utc => Some(Utc.from_utc_datetime(&wall).timestamp()),
            TimeBasis::Fixed(offset) => offset
                .from_local_datetime(&wall)
                .single()
                .map(|dt| dt.timestamp()),
        }
    }

    /// Builds the wall-clock time from the log's split fields and converts it.
    ///
    /// `yy` is a two-digit year in the 2000s. Out-of-range fields yield `None`.
    pub fn epoch_from_fields(
        &self,
        yy: u32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<i64> {
        let date = NaiveDate::from_ymd_opt(2000 + yy as i32, month, day)?;
        let wall = date.and_hms_opt(hour, minute, second)?;
        self.to_epoch(wall)
    }
}

impl FromStr for TimeBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "local" => return Ok(TimeBasis::Local),
            "utc" | "gmt" | "z" => return Ok(TimeBasis::Utc),
            _ => {}
        }

        let (sign, rest) = match trimmed.as_bytes().first() {
            Some(b'+') => (1, &trimmed[1..]),
            Some(b'-') => (-1, &trimmed[1..]),
            _ => return Err(format!("expected local, utc or ±HH:MM, got {:?}", s)),
        };
        let (hours, minutes) = rest
            .split_once(':')
            .ok_or_else(|| format!("offset {:?} is not ±HH:MM", s))?;
        let hours: i32 = hours
            .parse()
            .map_err(|_| format!("offset hours in {:?} are not numeric", s))?;
        let minutes: i32 = minutes
            .parse()
            .map_err(|_| format!("offset minutes in {:?} are not numeric", s))?;
        if hours > 23 || minutes > 59 {
            return Err(format!("offset {:?} is out of range", s));
        }
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(TimeBasis::Fixed)
            .ok_or_else(|| format!("offset {:?} is out of range", s))
    }
}

impl TryFrom<String> for TimeBasis {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeBasis> for String {
    fn from(value: TimeBasis) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBasis::Local => write!(f, "local"),
            TimeBasis::Utc => write!(f, "utc"),
            TimeBasis::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_basis() {
        let epoch = TimeBasis::Utc.epoch_from_fields(12, 4, 5, 20, 3, 15).unwrap();
        assert_eq!(epoch, 1_333_656_195);
    }

    #[test]
    fn test_fixed_offset_shifts_epoch() {
        let cdt: TimeBasis = "-05:00".parse().unwrap();
        let utc = TimeBasis::Utc.epoch_from_fields(12, 4, 5, 15, 3, 15).unwrap();
        let local = cdt.epoch_from_fields(12, 4, 5, 15, 3, 15).unwrap();
        assert_eq!(local - utc, 5 * 3600);
    }

    #[test]
    fn test_impossible_dates_rejected() {
        assert!(TimeBasis::Utc.epoch_from_fields(12, 13, 5, 0, 0, 0).is_none());
        assert!(TimeBasis::Utc.epoch_from_fields(12, 2, 30, 0, 0, 0).is_none());
        assert!(TimeBasis::Utc.epoch_from_fields(12, 4, 5, 24, 0, 0).is_none());
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("local".parse::<TimeBasis>().unwrap(), TimeBasis::Local);
        assert_eq!("UTC".parse::<TimeBasis>().unwrap(), TimeBasis::Utc);
        let plus = "+01:30".parse::<TimeBasis>().unwrap();
        assert_eq!(plus, TimeBasis::Fixed(FixedOffset::east_opt(5400).unwrap()));
        assert_eq!(plus.to_string(), "+01:30");
        assert!("somewhere".parse::<TimeBasis>().is_err());
        assert!("+25:00".parse::<TimeBasis>().is_err());
        assert!("+05".parse::<TimeBasis>().is_err());
    }
}
