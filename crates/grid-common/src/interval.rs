//! Coordinate intervals and min/max accumulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A coordinate interval `[start, end]`.
///
/// The interval keeps the order it was created with, so `start > end` is
/// allowed and describes a descending cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordInterval {
    pub start: f64,
    pub end: f64,
}

impl CoordInterval {
    /// Create a new interval.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Center of the interval.
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    /// Absolute width of the interval.
    pub fn width(&self) -> f64 {
        (self.end - self.start).abs()
    }

    pub fn is_ascending(&self) -> bool {
        self.start <= self.end
    }

    /// Same interval with `start <= end`.
    pub fn normalized(&self) -> Self {
        if self.is_ascending() {
            *self
        } else {
            Self::new(self.end, self.start)
        }
    }

    /// Check if a value lies within the interval, inclusive of both edges.
    pub fn contains(&self, value: f64) -> bool {
        let n = self.normalized();
        value >= n.start && value <= n.end
    }

    /// Compare both edges within a relative tolerance.
    pub fn fuzzy_equals(&self, other: &CoordInterval, tolerance: f64) -> bool {
        nearly_equal(self.start, other.start, tolerance) && nearly_equal(self.end, other.end, tolerance)
    }
}

impl fmt::Display for CoordInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn nearly_equal(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = (a - b).abs();
    if diff <= tolerance {
        return true;
    }
    diff <= tolerance * a.abs().max(b.abs())
}

/// Minimum and maximum of a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    /// Create from explicit bounds. The arguments are reordered if needed.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// The empty accumulator: any value added replaces both bounds.
    pub fn empty() -> Self {
        Self {
            min: f64::MAX,
            max: -f64::MAX,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Extend the range to include `value`. NaN values are skipped.
    pub fn add(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Accumulate the range of an iterator of values.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut mm = Self::empty();
        for v in values {
            mm.add(v);
        }
        mm
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl fmt::Display for MinMax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
