//! Time axes with calendar dates.

use std::fmt;

use chrono::{DateTime, Utc};
use grid_common::{CalendarDateUnit, GridError, GridResult, IndexRange};
use serde::Serialize;

use crate::axis::AxisType;
use crate::axis1d::GridAxis1D;
use crate::helper::GridAxis1DHelper;
use crate::subset::GridSubset;

/// A numeric axis whose values are offsets in a [`CalendarDateUnit`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridAxis1DTime {
    axis: GridAxis1D,
    date_unit: CalendarDateUnit,
}

impl GridAxis1DTime {
    /// Wrap an axis. A typed axis must have a time role.
    pub fn new(axis: GridAxis1D, date_unit: CalendarDateUnit) -> GridResult<Self> {
        if let Some(axis_type) = axis.axis_type() {
            if !axis_type.is_time() {
                return Err(GridError::invalid_argument(format!(
                    "axis '{}' of type {} is not a time axis",
                    axis.name(),
                    axis_type
                )));
            }
        }
        Ok(Self { axis, date_unit })
    }

    /// Wrap an axis whose `units` are a date unit such as
    /// `"hours since 2024-01-15T00:00:00Z"`.
    pub fn from_axis(axis: GridAxis1D) -> GridResult<Self> {
        let units = axis.units().ok_or_else(|| {
            GridError::InvalidTime(format!("time axis '{}' has no units", axis.name()))
        })?;
        let date_unit = CalendarDateUnit::parse(units)?;
        Self::new(axis, date_unit)
    }

    pub fn axis(&self) -> &GridAxis1D {
        &self.axis
    }

    pub fn date_unit(&self) -> &CalendarDateUnit {
        &self.date_unit
    }

    pub fn name(&self) -> &str {
        self.axis.name()
    }

    pub fn ncoords(&self) -> usize {
        self.axis.ncoords()
    }

    /// Date of an axis value.
    pub fn date_of(&self, value: f64) -> DateTime<Utc> {
        self.date_unit.make_date(value)
    }

    /// Axis value of a date.
    pub fn offset_of(&self, date: &DateTime<Utc>) -> f64 {
        self.date_unit.make_offset(date)
    }

    pub fn midpoint_date(&self, index: usize) -> GridResult<DateTime<Utc>> {
        Ok(self.date_of(self.axis.midpoint(index)?))
    }

    pub fn edge1_date(&self, index: usize) -> GridResult<DateTime<Utc>> {
        Ok(self.date_of(self.axis.edge1(index)?))
    }

    pub fn edge2_date(&self, index: usize) -> GridResult<DateTime<Utc>> {
        Ok(self.date_of(self.axis.edge2(index)?))
    }

    /// Dates of every midpoint.
    pub fn dates(&self) -> Vec<DateTime<Utc>> {
        (0..self.axis.ncoords())
            .map(|i| self.date_of(self.axis.midpoint_at(i)))
            .collect()
    }

    /// Index range selected by `params`, or `None` when unrestricted.
    ///
    /// A Time axis uses `time` then `time_latest`, a RunTime axis uses
    /// `run_time` then `run_time_latest`; other roles follow the
    /// [`GridAxis1D`] rules.
    pub fn subset_range(&self, params: &GridSubset) -> GridResult<Option<IndexRange>> {
        let (date, latest) = match self.axis.axis_type() {
            Some(AxisType::Time) | None => (params.time(), params.time_latest()),
            Some(AxisType::RunTime) => (params.run_time(), params.run_time_latest()),
            Some(_) => return self.axis.subset_range(params),
        };
        let index = match date {
            Some(date) => Some(GridAxis1DHelper::new(&self.axis).find_closest(self.offset_of(&date))?),
            None if latest => Some(self.axis.ncoords() - 1),
            None => None,
        };
        Ok(index.map(IndexRange::single))
    }

    pub fn subset(&self, params: &GridSubset) -> GridResult<GridAxis1DTime> {
        match self.subset_range(params)? {
            Some(range) => self.subset_by_index_range(&range),
            None => Ok(self.clone()),
        }
    }

    /// The one time closest to `date`.
    pub fn subset_by_date(&self, date: &DateTime<Utc>) -> GridResult<GridAxis1DTime> {
        Ok(self.with_axis(self.axis.subset_by_value(self.offset_of(date))?))
    }

    pub fn subset_by_index_range(&self, range: &IndexRange) -> GridResult<GridAxis1DTime> {
        Ok(self.with_axis(self.axis.subset_by_index_range(range)?))
    }

    pub fn subset_dependent(&self, independent: &GridAxis1D) -> GridResult<GridAxis1DTime> {
        Ok(self.with_axis(self.axis.subset_dependent(independent)?))
    }

    fn with_axis(&self, axis: GridAxis1D) -> Self {
        Self {
            axis,
            date_unit: self.date_unit,
        }
    }
}

impl fmt::Display for GridAxis1DTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.axis)?;
        write!(f, "  date unit: {}", self.date_unit)?;
        let n = self.axis.ncoords();
        write!(
            f,
            "\n  dates: {} to {}",
            self.date_of(self.axis.midpoint_at(0)).to_rfc3339(),
            self.date_of(self.axis.midpoint_at(n - 1)).to_rfc3339()
        )
    }
}
