//! Inclusive timestamp range used to select chargebacks by creation time

use super::errors::ChargebackError;
use super::result::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Pattern accepted on the command line and used for `created_time` output
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Pattern used for `disputed_dt` output
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Pattern used for the timestamps embedded in output file names
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Inclusive `[start, end]` filter over `createdAt`
///
/// No ordering is enforced between the bounds: an inverted range is a valid
/// filter that simply matches nothing.
///
/// # Examples
///
/// ```
/// use chargeback_export::domain::TimeRange;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// let range = TimeRange::for_day(day);
/// assert_eq!(range.to_string(), "2024-03-15T00:00:00..=2024-03-15T23:59:59");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeRange {
    /// Creates a range from its two inclusive bounds
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// The whole calendar day, `00:00:00` through `23:59:59`
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            start: day.and_time(NaiveTime::MIN),
            end: day.and_time(end_of_day()),
        }
    }

    /// Inclusive lower bound
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Inclusive upper bound
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Returns true when `timestamp` lies within both bounds
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// Returns true when no timestamp can satisfy the range
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..={}",
            self.start.format(TIMESTAMP_FORMAT),
            self.end.format(TIMESTAMP_FORMAT)
        )
    }
}

/// Parses a `yyyy-MM-ddTHH:mm:ss` timestamp
///
/// Fractional seconds, offsets and any other variation are rejected.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| {
        ChargebackError::InvalidTimestampFormat(format!(
            "'{value}' does not match yyyy-MM-ddTHH:mm:ss: {e}"
        ))
    })
}

fn end_of_day() -> NaiveTime {
    // 23:59:59 is always a valid time of day
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}
