//! Subset request parameters.

use std::fmt;

use chrono::{DateTime, Utc};
use grid_common::{CoordInterval, IndexRange};
use serde::{Deserialize, Serialize};

/// Horizontal index ranges, relative to the current horizontal axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizRanges {
    pub y: IndexRange,
    pub x: IndexRange,
}

/// What to keep when subsetting axes or a coordinate system.
///
/// Every parameter is optional; an axis whose role has no parameter is
/// returned unchanged. When both a value and a "latest"/"first" flag are set
/// for the same role, the value wins.
///
/// ```
/// use grid_coords::GridSubset;
///
/// let params = GridSubset::new().set_vert_point(500.0).set_time_latest(true);
/// assert_eq!(params.vert_point(), Some(500.0));
/// assert!(params.time_latest());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSubset {
    vert_point: Option<f64>,
    vert_intv: Option<CoordInterval>,
    ens_coord: Option<f64>,
    time: Option<DateTime<Utc>>,
    time_latest: bool,
    run_time: Option<DateTime<Utc>>,
    run_time_latest: bool,
    time_offset: Option<f64>,
    time_offset_intv: Option<CoordInterval>,
    time_offset_first: bool,
    horiz_ranges: Option<HorizRanges>,
}

impl GridSubset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_vert_point(mut self, value: f64) -> Self {
        self.vert_point = Some(value);
        self
    }

    pub fn set_vert_intv(mut self, interval: CoordInterval) -> Self {
        self.vert_intv = Some(interval);
        self
    }

    pub fn set_ens_coord(mut self, value: f64) -> Self {
        self.ens_coord = Some(value);
        self
    }

    pub fn set_time(mut self, date: DateTime<Utc>) -> Self {
        self.time = Some(date);
        self
    }

    pub fn set_time_latest(mut self, latest: bool) -> Self {
        self.time_latest = latest;
        self
    }

    pub fn set_run_time(mut self, date: DateTime<Utc>) -> Self {
        self.run_time = Some(date);
        self
    }

    pub fn set_run_time_latest(mut self, latest: bool) -> Self {
        self.run_time_latest = latest;
        self
    }

    pub fn set_time_offset(mut self, value: f64) -> Self {
        self.time_offset = Some(value);
        self
    }

    pub fn set_time_offset_intv(mut self, interval: CoordInterval) -> Self {
        self.time_offset_intv = Some(interval);
        self
    }

    pub fn set_time_offset_first(mut self, first: bool) -> Self {
        self.time_offset_first = first;
        self
    }

    pub fn set_horiz_ranges(mut self, y: IndexRange, x: IndexRange) -> Self {
        self.horiz_ranges = Some(HorizRanges { y, x });
        self
    }

    pub fn vert_point(&self) -> Option<f64> {
        self.vert_point
    }

    pub fn vert_intv(&self) -> Option<CoordInterval> {
        self.vert_intv
    }

    pub fn ens_coord(&self) -> Option<f64> {
        self.ens_coord
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    pub fn time_latest(&self) -> bool {
        self.time_latest
    }

    pub fn run_time(&self) -> Option<DateTime<Utc>> {
        self.run_time
    }

    pub fn run_time_latest(&self) -> bool {
        self.run_time_latest
    }

    pub fn time_offset(&self) -> Option<f64> {
        self.time_offset
    }

    pub fn time_offset_intv(&self) -> Option<CoordInterval> {
        self.time_offset_intv
    }

    pub fn time_offset_first(&self) -> bool {
        self.time_offset_first
    }

    pub fn horiz_ranges(&self) -> Option<&HorizRanges> {
        self.horiz_ranges.as_ref()
    }

    /// True when no parameter is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for GridSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(v) = self.vert_point {
            parts.push(format!("vertPoint={}", v));
        }
        if let Some(intv) = self.vert_intv {
            parts.push(format!("vertIntv={}", intv));
        }
        if let Some(v) = self.ens_coord {
            parts.push(format!("ensCoord={}", v));
        }
        if let Some(date) = self.time {
            parts.push(format!("time={}", date.to_rfc3339()));
        }
        if self.time_latest {
            parts.push("timeLatest".to_string());
        }
        if let Some(date) = self.run_time {
            parts.push(format!("runtime={}", date.to_rfc3339()));
        }
        if self.run_time_latest {
            parts.push("runtimeLatest".to_string());
        }
        if let Some(v) = self.time_offset {
            parts.push(format!("timeOffset={}", v));
        }
        if let Some(intv) = self.time_offset_intv {
            parts.push(format!("timeOffsetIntv={}", intv));
        }
        if self.time_offset_first {
            parts.push("timeOffsetFirst".to_string());
        }
        if let Some(h) = &self.horiz_ranges {
            parts.push(format!("horiz=({}, {})", h.y, h.x));
        }
        write!(f, "GridSubset{{{}}}", parts.join(", "))
    }
}
