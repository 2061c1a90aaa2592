//! Nearest-coordinate search on a [`GridAxis1D`].

use grid_common::{CoordInterval, GridError, GridResult, IndexRange};

use crate::axis1d::GridAxis1D;

/// Finds the coordinate of an axis closest to a value or interval.
///
/// Ties go to the lowest index.
#[derive(Debug, Clone, Copy)]
pub struct GridAxis1DHelper<'a> {
    axis: &'a GridAxis1D,
}

impl<'a> GridAxis1DHelper<'a> {
    pub fn new(axis: &'a GridAxis1D) -> Self {
        Self { axis }
    }

    /// Index of the coordinate closest to `target`.
    ///
    /// On interval axes a cell containing the target is preferred over a
    /// cell whose center is merely nearer.
    pub fn find_closest(&self, target: f64) -> GridResult<usize> {
        if target.is_nan() {
            return Err(GridError::invalid_argument(format!(
                "cannot search axis '{}' for NaN",
                self.axis.name()
            )));
        }
        let axis = self.axis;
        let distance = |i: usize| (axis.midpoint_at(i) - target).abs();
        let all = 0..axis.ncoords();

        if axis.spacing().is_interval() {
            let containing = all
                .clone()
                .filter(|&i| axis.interval_at(i).contains(target));
            if let Some(index) = argmin(containing, distance) {
                return Ok(index);
            }
        }
        argmin(all, distance).ok_or_else(|| self.empty_axis())
    }

    /// Index of the coordinate closest to `target`.
    ///
    /// Interval axes compare both edges; point axes use the center of `target`.
    pub fn find_closest_interval(&self, target: CoordInterval) -> GridResult<usize> {
        if target.start.is_nan() || target.end.is_nan() {
            return Err(GridError::invalid_argument(format!(
                "cannot search axis '{}' for interval {}",
                self.axis.name(),
                target
            )));
        }
        let axis = self.axis;
        if !axis.spacing().is_interval() {
            return self.find_closest(target.midpoint());
        }
        let distance = |i: usize| {
            (axis.edge1_at(i) - target.start).abs() + (axis.edge2_at(i) - target.end).abs()
        };
        argmin(0..axis.ncoords(), distance).ok_or_else(|| self.empty_axis())
    }

    /// Single-coordinate subset at the coordinate closest to `target`.
    pub fn subset_closest(&self, target: f64) -> GridResult<GridAxis1D> {
        let index = self.find_closest(target)?;
        self.axis.subset_by_index_range(&IndexRange::single(index))
    }

    /// Single-coordinate subset at the coordinate closest to `target`.
    pub fn subset_closest_interval(&self, target: CoordInterval) -> GridResult<GridAxis1D> {
        let index = self.find_closest_interval(target)?;
        self.axis.subset_by_index_range(&IndexRange::single(index))
    }

    fn empty_axis(&self) -> GridError {
        GridError::invalid_state(format!("axis '{}' has no coordinates", self.axis.name()))
    }
}

fn argmin<I, F>(indices: I, distance: F) -> Option<usize>
where
    I: Iterator<Item = usize>,
    F: Fn(usize) -> f64,
{
    let mut best: Option<(usize, f64)> = None;
    for i in indices {
        let d = distance(i);
        match best {
            Some((_, best_d)) if !(d < best_d) => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}
