//! One-dimensional coordinate axis.
//!
//! A [`GridAxis1D`] describes the coordinates along one dimension of a grid.
//! Regular spacings are defined by `start` and `resolution`; irregular
//! spacings keep their values. Edges and midpoints are derived on demand:
//!
//! | Spacing               | edge1(i)                | edge2(i)                | midpoint(i)          |
//! |-----------------------|-------------------------|-------------------------|----------------------|
//! | regularPoint          | start + (i - 0.5) * res | start + (i + 0.5) * res | start + i * res      |
//! | regularInterval       | start + i * res         | start + (i + 1) * res   | start + (i + 0.5) * res |
//! | irregularPoint        | halfway to v[i-1]       | halfway to v[i+1]       | v[i]                 |
//! | contiguousInterval    | v[i]                    | v[i+1]                  | center               |
//! | discontiguousInterval | v[2i]                   | v[2i+1]                 | center               |
//!
//! The end cells of an irregularPoint axis extend half a step beyond the
//! outermost values. A single irregular point has zero width.

use std::fmt;

use grid_common::{Attributes, CoordInterval, GridError, GridResult, IndexRange, MinMax};
use ndarray::{Array1, Array2, ArrayD, IxDyn};
use serde::Serialize;

use crate::axis::{AxisType, DependenceType, Spacing};
use crate::helper::GridAxis1DHelper;
use crate::subset::GridSubset;

/// An immutable 1D coordinate axis.
///
/// # Example
///
/// ```
/// use grid_coords::{AxisType, GridAxis1D, Spacing};
///
/// let axis = GridAxis1D::builder()
///     .set_name("level")
///     .set_axis_type(AxisType::Pressure)
///     .set_spacing(Spacing::IrregularPoint)
///     .set_values(vec![1000.0, 850.0, 500.0])
///     .build()
///     .unwrap();
///
/// assert_eq!(axis.ncoords(), 3);
/// assert_eq!(axis.midpoint(1).unwrap(), 850.0);
/// assert!(!axis.is_ascending());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridAxis1D {
    name: String,
    description: Option<String>,
    units: Option<String>,
    axis_type: Option<AxisType>,
    attributes: Attributes,
    spacing: Spacing,
    dependence_type: DependenceType,
    depends_on: Vec<String>,
    resolution: f64,
    is_subset: bool,
    ncoords: usize,
    start_value: f64,
    end_value: f64,
    /// Empty for regular spacings.
    values: Vec<f64>,
    range: IndexRange,
}

impl GridAxis1D {
    pub fn builder() -> GridAxis1DBuilder {
        GridAxis1DBuilder::new()
    }

    /// A builder preloaded with every field of this axis.
    pub fn to_builder(&self) -> GridAxis1DBuilder {
        GridAxis1DBuilder {
            name: self.name.clone(),
            description: self.description.clone(),
            units: self.units.clone(),
            axis_type: self.axis_type,
            attributes: self.attributes.clone(),
            spacing: Some(self.spacing),
            dependence_type: self.dependence_type,
            depends_on: self.depends_on.clone(),
            resolution: self.resolution,
            is_subset: self.is_subset,
            ncoords: self.ncoords,
            start_value: self.start_value,
            end_value: self.end_value,
            values: (!self.spacing.is_regular()).then(|| self.values.clone()),
            range: Some(self.range.clone()),
        }
    }

    // ---- metadata ----

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn axis_type(&self) -> Option<AxisType> {
        self.axis_type
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn dependence_type(&self) -> DependenceType {
        self.dependence_type
    }

    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    /// Coordinate increment. Informational for irregular spacings.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn is_subset(&self) -> bool {
        self.is_subset
    }

    pub fn ncoords(&self) -> usize {
        self.ncoords
    }

    /// First coordinate value: `start` for regular spacings, else the first stored value.
    pub fn start_value(&self) -> f64 {
        self.start_value
    }

    /// Last coordinate value: `end` for regular spacings, else the last stored value.
    pub fn end_value(&self) -> f64 {
        self.end_value
    }

    /// A copy of the stored values, `None` for regular spacings.
    pub fn values(&self) -> Option<Vec<f64>> {
        (!self.spacing.is_regular()).then(|| self.values.clone())
    }

    /// Indices of the original axis this axis was taken from.
    pub fn range(&self) -> &IndexRange {
        &self.range
    }

    /// Identity range over this axis; empty for a scalar axis.
    pub fn index_range(&self) -> IndexRange {
        if self.dependence_type == DependenceType::Scalar {
            return IndexRange::empty();
        }
        IndexRange::make(self.axis_type.map(|t| t.name()), self.ncoords)
    }

    // ---- coordinate algebra ----

    fn check_index(&self, index: usize) -> GridResult<()> {
        if index >= self.ncoords {
            return Err(GridError::IndexOutOfRange {
                index,
                len: self.ncoords,
            });
        }
        Ok(())
    }

    pub fn edge1(&self, index: usize) -> GridResult<f64> {
        self.check_index(index)?;
        Ok(self.edge1_at(index))
    }

    pub fn edge2(&self, index: usize) -> GridResult<f64> {
        self.check_index(index)?;
        Ok(self.edge2_at(index))
    }

    pub fn midpoint(&self, index: usize) -> GridResult<f64> {
        self.check_index(index)?;
        Ok(self.midpoint_at(index))
    }

    pub fn coord_interval(&self, index: usize) -> GridResult<CoordInterval> {
        self.check_index(index)?;
        Ok(self.interval_at(index))
    }

    // The *_at accessors assume index < ncoords.

    pub(crate) fn edge1_at(&self, i: usize) -> f64 {
        let v = &self.values;
        match self.spacing {
            Spacing::RegularPoint => self.start_value + (i as f64 - 0.5) * self.resolution,
            Spacing::RegularInterval => self.start_value + i as f64 * self.resolution,
            Spacing::IrregularPoint => {
                if self.ncoords == 1 {
                    v[0]
                } else if i > 0 {
                    (v[i - 1] + v[i]) / 2.0
                } else {
                    v[0] - (v[1] - v[0]) / 2.0
                }
            }
            Spacing::ContiguousInterval => v[i],
            Spacing::DiscontiguousInterval => v[2 * i],
        }
    }

    pub(crate) fn edge2_at(&self, i: usize) -> f64 {
        let v = &self.values;
        let n = self.ncoords;
        match self.spacing {
            Spacing::RegularPoint => self.start_value + (i as f64 + 0.5) * self.resolution,
            Spacing::RegularInterval => self.start_value + (i + 1) as f64 * self.resolution,
            Spacing::IrregularPoint => {
                if n == 1 {
                    v[0]
                } else if i < n - 1 {
                    (v[i] + v[i + 1]) / 2.0
                } else {
                    v[n - 1] + (v[n - 1] - v[n - 2]) / 2.0
                }
            }
            Spacing::ContiguousInterval => v[i + 1],
            Spacing::DiscontiguousInterval => v[2 * i + 1],
        }
    }

    pub(crate) fn midpoint_at(&self, i: usize) -> f64 {
        match self.spacing {
            Spacing::RegularPoint => self.start_value + i as f64 * self.resolution,
            Spacing::RegularInterval => self.start_value + (i as f64 + 0.5) * self.resolution,
            Spacing::IrregularPoint => self.values[i],
            Spacing::ContiguousInterval | Spacing::DiscontiguousInterval => {
                (self.edge1_at(i) + self.edge2_at(i)) / 2.0
            }
        }
    }

    pub(crate) fn interval_at(&self, i: usize) -> CoordInterval {
        CoordInterval::new(self.edge1_at(i), self.edge2_at(i))
    }

    /// Whether coordinates increase along the axis.
    ///
    /// For discontiguous intervals only the first and last bounds are
    /// compared; overlapping or unordered cells can fool this test.
    pub fn is_ascending(&self) -> bool {
        let v = &self.values;
        match self.spacing {
            Spacing::RegularPoint | Spacing::RegularInterval => self.resolution > 0.0,
            Spacing::IrregularPoint => v[0] <= v[self.ncoords - 1],
            Spacing::ContiguousInterval => v[0] <= v[self.ncoords],
            Spacing::DiscontiguousInterval => v[0] <= v[2 * self.ncoords - 1],
        }
    }

    /// Extent of the axis including cell edges.
    pub fn coord_edge_min_max(&self) -> MinMax {
        match self.spacing {
            Spacing::DiscontiguousInterval => MinMax::from_values(self.values.iter().copied()),
            _ => MinMax::new(self.edge1_at(0), self.edge2_at(self.ncoords - 1)),
        }
    }

    /// Midpoints as an array: rank 0 for a scalar axis, else `[ncoords]`.
    pub fn coords_as_array(&self) -> ArrayD<f64> {
        if self.dependence_type == DependenceType::Scalar {
            return ArrayD::from_elem(IxDyn(&[]), self.midpoint_at(0));
        }
        Array1::from_iter((0..self.ncoords).map(|i| self.midpoint_at(i))).into_dyn()
    }

    /// Cell edges as an `[ncoords, 2]` array.
    pub fn coord_bounds_as_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.ncoords, 2), |(i, j)| {
            if j == 0 {
                self.edge1_at(i)
            } else {
                self.edge2_at(i)
            }
        })
    }

    /// Iterate over the coordinates: points for point spacings, intervals
    /// for interval spacings.
    pub fn iter(&self) -> CoordIter<'_> {
        CoordIter {
            axis: self,
            next: 0,
        }
    }

    /// One-line description for diagnostics.
    pub fn summary(&self) -> String {
        let axis_type = self.axis_type.map(|t| t.name()).unwrap_or("");
        format!(
            "{} ({}) npts={} [{}, {}] {} resolution={} range={}",
            self.name,
            axis_type,
            self.ncoords,
            self.start_value,
            self.end_value,
            self.spacing,
            self.resolution,
            self.range
        )
    }

    // ---- subsetting ----

    /// Index range selected by `params`, or `None` when this axis is not restricted.
    ///
    /// Horizontal axes are subset through
    /// [`GridHorizCoordinateSystem`](crate::GridHorizCoordinateSystem) and
    /// fail here with [`GridError::InvalidState`].
    pub fn subset_range(&self, params: &GridSubset) -> GridResult<Option<IndexRange>> {
        let Some(axis_type) = self.axis_type else {
            return Ok(None);
        };
        if axis_type.is_horiz() {
            return Err(GridError::invalid_state(format!(
                "horizontal axis '{}' ({}) must be subset through its horizontal coordinate system",
                self.name, axis_type
            )));
        }

        let helper = GridAxis1DHelper::new(self);
        let index = match axis_type {
            AxisType::GeoZ | AxisType::Height | AxisType::Pressure => {
                if let Some(value) = params.vert_point() {
                    Some(helper.find_closest(value)?)
                } else if let Some(intv) = params.vert_intv() {
                    Some(helper.find_closest_interval(intv)?)
                } else {
                    None
                }
            }
            AxisType::Ensemble => match params.ens_coord() {
                Some(value) => Some(helper.find_closest(value)?),
                None => None,
            },
            AxisType::TimeOffset => {
                if let Some(value) = params.time_offset() {
                    Some(helper.find_closest(value)?)
                } else if let Some(intv) = params.time_offset_intv() {
                    Some(helper.find_closest_interval(intv)?)
                } else if params.time_offset_first() {
                    Some(0)
                } else {
                    None
                }
            }
            _ => None,
        };
        Ok(index.map(IndexRange::single))
    }

    /// Subset according to the axis role; an unrestricted axis comes back unchanged.
    pub fn subset(&self, params: &GridSubset) -> GridResult<GridAxis1D> {
        match self.subset_range(params)? {
            Some(range) => self.subset_by_index_range(&range),
            None => Ok(self.clone()),
        }
    }

    /// The one coordinate closest to `value`.
    pub fn subset_by_value(&self, value: f64) -> GridResult<GridAxis1D> {
        GridAxis1DHelper::new(self).subset_closest(value)
    }

    /// The one coordinate closest to `interval`.
    pub fn subset_by_interval(&self, interval: CoordInterval) -> GridResult<GridAxis1D> {
        GridAxis1DHelper::new(self).subset_closest_interval(interval)
    }

    /// Follow the indices chosen on the axis this one depends on.
    ///
    /// `independent` must be a subset of an axis with the same indices as
    /// this one.
    pub fn subset_dependent(&self, independent: &GridAxis1D) -> GridResult<GridAxis1D> {
        if !self.depends_on.iter().any(|d| d == independent.name()) {
            return Err(GridError::invalid_argument(format!(
                "axis '{}' does not depend on '{}'",
                self.name,
                independent.name()
            )));
        }
        if !independent.is_subset() {
            return Ok(self.clone());
        }
        self.subset_by_index_range(independent.range())
    }

    /// A new axis holding the coordinates at `range`.
    ///
    /// Regular axes stay regular except for regularInterval with a stride,
    /// which becomes discontiguous so the cells keep their true edges.
    /// Contiguous intervals taken with a stride become discontiguous too.
    pub fn subset_by_index_range(&self, range: &IndexRange) -> GridResult<GridAxis1D> {
        let (first, last) = match range.last() {
            Some(last) => (range.first(), last),
            None => {
                return Err(GridError::invalid_range(format!(
                    "empty subset range for axis '{}'",
                    self.name
                )))
            }
        };
        range.check_within(self.ncoords)?;
        let stride = range.stride();
        let n = range.len();

        let builder = self.to_builder();
        let builder = match self.spacing {
            Spacing::RegularPoint => builder.set_regular(
                n,
                self.midpoint_at(first),
                self.midpoint_at(last),
                self.resolution * stride as f64,
            ),
            Spacing::RegularInterval if stride == 1 => builder.set_regular(
                n,
                self.edge1_at(first),
                self.edge2_at(last),
                self.resolution,
            ),
            Spacing::IrregularPoint => builder
                .set_ncoords(n)
                .set_values(range.iter().map(|i| self.values[i]).collect()),
            Spacing::ContiguousInterval if stride == 1 => builder
                .set_ncoords(n)
                .set_values(self.values[first..=last + 1].to_vec()),
            Spacing::RegularInterval
            | Spacing::ContiguousInterval
            | Spacing::DiscontiguousInterval => builder
                .set_spacing(Spacing::DiscontiguousInterval)
                .set_resolution(self.resolution * stride as f64)
                .set_ncoords(n)
                .set_values(
                    range
                        .iter()
                        .flat_map(|i| [self.edge1_at(i), self.edge2_at(i)])
                        .collect(),
                ),
        };

        tracing::trace!(axis = %self.name, range = %range, "subsetting axis");
        builder
            .set_range(self.range.compose(range)?)
            .set_is_subset(true)
            .build()
    }
}

impl fmt::Display for GridAxis1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        if let Some(units) = &self.units {
            writeln!(f, "  units: {}", units)?;
        }
        if let Some(description) = &self.description {
            writeln!(f, "  description: {}", description)?;
        }
        write!(f, "  dependence: {}", self.dependence_type)?;
        if !self.depends_on.is_empty() {
            write!(f, " on {}", self.depends_on.join(","))?;
        }
        if !self.spacing.is_regular() {
            write!(f, "\n  values: {:?}", self.values)?;
        }
        Ok(())
    }
}

/// A coordinate of a [`GridAxis1D`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    Point(f64),
    Interval(CoordInterval),
}

impl Coord {
    /// The point, or the center of the interval.
    pub fn midpoint(&self) -> f64 {
        match self {
            Coord::Point(v) => *v,
            Coord::Interval(intv) => intv.midpoint(),
        }
    }
}

/// Iterator over the coordinates of an axis.
#[derive(Debug, Clone)]
pub struct CoordIter<'a> {
    axis: &'a GridAxis1D,
    next: usize,
}

impl Iterator for CoordIter<'_> {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.next >= self.axis.ncoords {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some(if self.axis.spacing.is_interval() {
            Coord::Interval(self.axis.interval_at(i))
        } else {
            Coord::Point(self.axis.midpoint_at(i))
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.axis.ncoords.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CoordIter<'_> {}

impl<'a> IntoIterator for &'a GridAxis1D {
    type Item = Coord;
    type IntoIter = CoordIter<'a>;

    fn into_iter(self) -> CoordIter<'a> {
        self.iter()
    }
}

/// Builder for [`GridAxis1D`].
///
/// `build` takes the builder by value, so one builder makes one axis:
///
/// ```compile_fail
/// use grid_coords::{AxisType, GridAxis1D, Spacing};
///
/// let builder = GridAxis1D::builder()
///     .set_name("x")
///     .set_axis_type(AxisType::GeoX)
///     .set_spacing(Spacing::RegularPoint)
///     .set_regular(10, 0.0, 9.0, 1.0);
/// let first = builder.build();
/// let second = builder.build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct GridAxis1DBuilder {
    name: String,
    description: Option<String>,
    units: Option<String>,
    axis_type: Option<AxisType>,
    attributes: Attributes,
    spacing: Option<Spacing>,
    dependence_type: DependenceType,
    depends_on: Vec<String>,
    resolution: f64,
    is_subset: bool,
    ncoords: usize,
    start_value: f64,
    end_value: f64,
    values: Option<Vec<f64>>,
    range: Option<IndexRange>,
}

impl GridAxis1DBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn set_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn set_axis_type(mut self, axis_type: AxisType) -> Self {
        self.axis_type = Some(axis_type);
        self
    }

    pub fn set_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn set_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn set_dependence_type(mut self, dependence_type: DependenceType) -> Self {
        self.dependence_type = dependence_type;
        self
    }

    pub fn set_depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Number of coordinates. May be left unset when values are given.
    pub fn set_ncoords(mut self, ncoords: usize) -> Self {
        self.ncoords = ncoords;
        self
    }

    /// Coordinate values for irregular spacings: one per point,
    /// `ncoords + 1` contiguous edges, or `2 * ncoords` bounds.
    pub fn set_values(mut self, values: Vec<f64>) -> Self {
        self.values = Some(values);
        self
    }

    /// Regular coordinates `start, start + increment, ...`. Clears any values.
    pub fn set_regular(mut self, ncoords: usize, start: f64, end: f64, increment: f64) -> Self {
        self.ncoords = ncoords;
        self.start_value = start;
        self.end_value = end;
        self.resolution = increment;
        self.values = None;
        self
    }

    /// Indices of the original axis; defaults to the identity range.
    pub fn set_range(mut self, range: IndexRange) -> Self {
        self.range = Some(range);
        self
    }

    pub(crate) fn set_is_subset(mut self, is_subset: bool) -> Self {
        self.is_subset = is_subset;
        self
    }

    pub fn build(self) -> GridResult<GridAxis1D> {
        let spacing = self.spacing.ok_or_else(|| {
            GridError::invalid_argument(format!("axis '{}' has no spacing", self.name))
        })?;
        if self.dependence_type == DependenceType::Independent && self.axis_type.is_none() {
            return Err(GridError::invalid_argument(format!(
                "independent axis '{}' must have an axis type",
                self.name
            )));
        }
        if self.dependence_type == DependenceType::Dependent && self.depends_on.is_empty() {
            return Err(GridError::invalid_argument(format!(
                "dependent axis '{}' must name the axes it depends on",
                self.name
            )));
        }

        let ncoords = match (self.ncoords, &self.values) {
            (0, Some(values)) => match spacing {
                Spacing::IrregularPoint => values.len(),
                Spacing::ContiguousInterval => values.len().saturating_sub(1),
                Spacing::DiscontiguousInterval => values.len() / 2,
                Spacing::RegularPoint | Spacing::RegularInterval => 0,
            },
            (n, _) => n,
        };
        if ncoords == 0 {
            return Err(GridError::invalid_argument(format!(
                "axis '{}' must have at least one coordinate",
                self.name
            )));
        }
        if self.dependence_type == DependenceType::Scalar && ncoords != 1 {
            return Err(GridError::invalid_argument(format!(
                "scalar axis '{}' has {} coordinates",
                self.name, ncoords
            )));
        }

        let (start_value, end_value, values) = if spacing.is_regular() {
            if self.values.is_some() {
                return Err(GridError::invalid_argument(format!(
                    "regular axis '{}' must not have values",
                    self.name
                )));
            }
            if !self.resolution.is_finite() || !self.start_value.is_finite() {
                return Err(GridError::invalid_argument(format!(
                    "regular axis '{}' needs a finite start and resolution",
                    self.name
                )));
            }
            (self.start_value, self.end_value, Vec::new())
        } else {
            let values = self.values.ok_or_else(|| {
                GridError::invalid_argument(format!("{} axis '{}' has no values", spacing, self.name))
            })?;
            let expected = spacing.values_len(ncoords);
            if values.len() != expected {
                return Err(GridError::ShapeMismatch {
                    name: self.name,
                    expected: vec![expected],
                    found: vec![values.len()],
                });
            }
            (values[0], values[expected - 1], values)
        };

        let range = match self.range {
            Some(range) if range.len() != ncoords => {
                return Err(GridError::invalid_range(format!(
                    "range {} of axis '{}' does not match {} coordinates",
                    range, self.name, ncoords
                )))
            }
            Some(range) => range,
            None => IndexRange::make(None, ncoords),
        };
        let range = match self.axis_type {
            Some(axis_type) => range.with_name(axis_type.name()),
            None => range,
        };

        Ok(GridAxis1D {
            name: self.name,
            description: self.description,
            units: self.units,
            axis_type: self.axis_type,
            attributes: self.attributes,
            spacing,
            dependence_type: self.dependence_type,
            depends_on: self.depends_on,
            resolution: self.resolution,
            is_subset: self.is_subset,
            ncoords,
            start_value,
            end_value,
            values,
            range,
        })
    }
}
