//! Calendar date units for time coordinate axes.
//!
//! Time axes store plain numbers; the `units` attribute ("hours since
//! 2024-01-15T00:00:00Z") turns those numbers into dates.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GridError, GridResult};

/// The period a time offset is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimePeriod {
    /// Parse a period name (singular, plural or abbreviated).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(Self::Seconds),
            "min" | "mins" | "minute" | "minutes" => Some(Self::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(Self::Hours),
            "d" | "day" | "days" => Some(Self::Days),
            _ => None,
        }
    }

    /// Length of one period in seconds.
    pub fn seconds(&self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
            Self::Days => 86_400.0,
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds => write!(f, "seconds"),
            Self::Minutes => write!(f, "minutes"),
            Self::Hours => write!(f, "hours"),
            Self::Days => write!(f, "days"),
        }
    }
}

/// A "<period> since <base date>" unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDateUnit {
    pub period: TimePeriod,
    pub base: DateTime<Utc>,
}

impl CalendarDateUnit {
    pub fn new(period: TimePeriod, base: DateTime<Utc>) -> Self {
        Self { period, base }
    }

    /// Parse a unit string such as `"hours since 2024-01-15T00:00:00Z"`.
    pub fn parse(s: &str) -> GridResult<Self> {
        let (period, base) = s
            .split_once(" since ")
            .ok_or_else(|| GridError::InvalidTime(format!("not a date unit: '{}'", s)))?;
        let period = TimePeriod::parse(period)
            .ok_or_else(|| GridError::InvalidTime(format!("unknown time period in '{}'", s)))?;
        let base = parse_iso8601(base.trim())?;
        Ok(Self { period, base })
    }

    /// Date of an axis value expressed in this unit.
    pub fn make_date(&self, value: f64) -> DateTime<Utc> {
        let millis = (value * self.period.seconds() * 1000.0).round() as i64;
        self.base + Duration::milliseconds(millis)
    }

    /// Axis value of a date expressed in this unit.
    pub fn make_offset(&self, date: &DateTime<Utc>) -> f64 {
        let millis = (*date - self.base).num_milliseconds() as f64;
        millis / 1000.0 / self.period.seconds()
    }
}

impl fmt::Display for CalendarDateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} since {}", self.period, self.base.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

/// Parse an ISO 8601 date or datetime, assuming UTC when no zone is given.
pub fn parse_iso8601(s: &str) -> GridResult<DateTime<Utc>> {
    // Full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Without timezone, 'T' or space separated
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s.trim_end_matches('Z'), fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Date only
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(GridError::InvalidTime(s.to_string()))
}
