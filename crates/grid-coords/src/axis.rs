//! Axis taxonomy: semantic roles, coordinate spacing and dependence.

use std::fmt;

use grid_common::{GridResult, IndexRange};
use serde::{Deserialize, Serialize};

use crate::axis1d::GridAxis1D;
use crate::subset::GridSubset;
use crate::time_axis::GridAxis1DTime;

/// Semantic role of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisType {
    RunTime,
    Ensemble,
    Time,
    GeoX,
    GeoY,
    GeoZ,
    Lat,
    Lon,
    Height,
    Pressure,
    RadialAzimuth,
    RadialDistance,
    RadialElevation,
    Spectral,
    TimeOffset,
    Dimension,
}

impl AxisType {
    pub const ALL: [AxisType; 16] = [
        AxisType::RunTime,
        AxisType::Ensemble,
        AxisType::Time,
        AxisType::GeoX,
        AxisType::GeoY,
        AxisType::GeoZ,
        AxisType::Lat,
        AxisType::Lon,
        AxisType::Height,
        AxisType::Pressure,
        AxisType::RadialAzimuth,
        AxisType::RadialDistance,
        AxisType::RadialElevation,
        AxisType::Spectral,
        AxisType::TimeOffset,
        AxisType::Dimension,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AxisType::RunTime => "RunTime",
            AxisType::Ensemble => "Ensemble",
            AxisType::Time => "Time",
            AxisType::GeoX => "GeoX",
            AxisType::GeoY => "GeoY",
            AxisType::GeoZ => "GeoZ",
            AxisType::Lat => "Lat",
            AxisType::Lon => "Lon",
            AxisType::Height => "Height",
            AxisType::Pressure => "Pressure",
            AxisType::RadialAzimuth => "RadialAzimuth",
            AxisType::RadialDistance => "RadialDistance",
            AxisType::RadialElevation => "RadialElevation",
            AxisType::Spectral => "Spectral",
            AxisType::TimeOffset => "TimeOffset",
            AxisType::Dimension => "Dimension",
        }
    }

    /// Parse an axis type name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
    }

    pub fn is_horiz(&self) -> bool {
        matches!(
            self,
            AxisType::GeoX | AxisType::GeoY | AxisType::Lat | AxisType::Lon
        )
    }

    pub fn is_vert(&self) -> bool {
        matches!(self, AxisType::GeoZ | AxisType::Height | AxisType::Pressure)
    }

    pub fn is_time(&self) -> bool {
        matches!(
            self,
            AxisType::Time | AxisType::RunTime | AxisType::TimeOffset
        )
    }

    /// Coordinate system role filled by an axis of this type, if any.
    pub fn role(&self) -> Option<AxisRole> {
        match self {
            AxisType::RunTime => Some(AxisRole::RunTime),
            AxisType::Ensemble => Some(AxisRole::Ensemble),
            AxisType::Time => Some(AxisRole::Time),
            AxisType::TimeOffset => Some(AxisRole::TimeOffset),
            AxisType::GeoZ | AxisType::Height | AxisType::Pressure => Some(AxisRole::Vertical),
            AxisType::GeoY | AxisType::Lat => Some(AxisRole::Y),
            AxisType::GeoX | AxisType::Lon => Some(AxisRole::X),
            _ => None,
        }
    }
}

impl fmt::Display for AxisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Slot an axis occupies in a coordinate system, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AxisRole {
    RunTime,
    Ensemble,
    Time,
    TimeOffset,
    Vertical,
    Y,
    X,
}

impl AxisRole {
    pub const ALL: [AxisRole; 7] = [
        AxisRole::RunTime,
        AxisRole::Ensemble,
        AxisRole::Time,
        AxisRole::TimeOffset,
        AxisRole::Vertical,
        AxisRole::Y,
        AxisRole::X,
    ];

    /// One letter code used in function summaries such as `GRID(T,Z,Y,X)`.
    pub fn code(&self) -> &'static str {
        match self {
            AxisRole::RunTime => "R",
            AxisRole::Ensemble => "E",
            AxisRole::Time => "T",
            AxisRole::TimeOffset => "O",
            AxisRole::Vertical => "Z",
            AxisRole::Y => "Y",
            AxisRole::X => "X",
        }
    }
}

/// How coordinate values are laid out along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Spacing {
    /// Evenly spaced points: `start + i * resolution`.
    RegularPoint,
    /// Evenly spaced, adjacent cells of width `resolution`.
    RegularInterval,
    /// Unevenly spaced points, one value per coordinate.
    IrregularPoint,
    /// Adjacent cells sharing edges, `ncoords + 1` edge values.
    ContiguousInterval,
    /// Cells with independent bounds, `2 * ncoords` values.
    DiscontiguousInterval,
}

impl Spacing {
    pub fn is_regular(&self) -> bool {
        matches!(self, Spacing::RegularPoint | Spacing::RegularInterval)
    }

    pub fn is_interval(&self) -> bool {
        matches!(
            self,
            Spacing::RegularInterval | Spacing::ContiguousInterval | Spacing::DiscontiguousInterval
        )
    }

    /// Number of stored values an axis of `ncoords` coordinates needs.
    /// Regular spacings store none.
    pub fn values_len(&self, ncoords: usize) -> usize {
        match self {
            Spacing::RegularPoint | Spacing::RegularInterval => 0,
            Spacing::IrregularPoint => ncoords,
            Spacing::ContiguousInterval => ncoords + 1,
            Spacing::DiscontiguousInterval => 2 * ncoords,
        }
    }
}

impl fmt::Display for Spacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Spacing::RegularPoint => "regularPoint",
            Spacing::RegularInterval => "regularInterval",
            Spacing::IrregularPoint => "irregularPoint",
            Spacing::ContiguousInterval => "contiguousInterval",
            Spacing::DiscontiguousInterval => "discontiguousInterval",
        };
        write!(f, "{}", name)
    }
}

/// How an axis relates to the dimensions of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DependenceType {
    /// The axis is its own dimension.
    #[default]
    Independent,
    /// Values follow the axes named in `depends_on`.
    Dependent,
    /// A single coordinate with no dimension.
    Scalar,
    /// Two-dimensional coordinate.
    TwoD,
    /// Regular forecast model run collection offsets.
    FmrcReg,
    /// A dimension without coordinate values.
    Dimension,
}

impl fmt::Display for DependenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Any axis that can appear in a coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub enum GridAxis {
    Axis1D(GridAxis1D),
    Time(GridAxis1DTime),
}

impl GridAxis {
    /// The underlying 1D axis; for a time axis, its numeric axis.
    pub fn as_1d(&self) -> &GridAxis1D {
        match self {
            GridAxis::Axis1D(axis) => axis,
            GridAxis::Time(axis) => axis.axis(),
        }
    }

    pub fn as_time(&self) -> Option<&GridAxis1DTime> {
        match self {
            GridAxis::Time(axis) => Some(axis),
            GridAxis::Axis1D(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        self.as_1d().name()
    }

    pub fn axis_type(&self) -> Option<AxisType> {
        self.as_1d().axis_type()
    }

    pub fn role(&self) -> Option<AxisRole> {
        self.axis_type().and_then(|t| t.role())
    }

    pub fn spacing(&self) -> Spacing {
        self.as_1d().spacing()
    }

    pub fn dependence_type(&self) -> DependenceType {
        self.as_1d().dependence_type()
    }

    pub fn depends_on(&self) -> &[String] {
        self.as_1d().depends_on()
    }

    pub fn ncoords(&self) -> usize {
        self.as_1d().ncoords()
    }

    pub fn units(&self) -> Option<&str> {
        self.as_1d().units()
    }

    pub fn is_subset(&self) -> bool {
        self.as_1d().is_subset()
    }

    /// Index range chosen by `params`, relative to this axis; `None` keeps every index.
    pub fn subset_range(&self, params: &GridSubset) -> GridResult<Option<IndexRange>> {
        match self {
            GridAxis::Axis1D(axis) => axis.subset_range(params),
            GridAxis::Time(axis) => axis.subset_range(params),
        }
    }

    pub fn subset(&self, params: &GridSubset) -> GridResult<GridAxis> {
        match self {
            GridAxis::Axis1D(axis) => axis.subset(params).map(GridAxis::Axis1D),
            GridAxis::Time(axis) => axis.subset(params).map(GridAxis::Time),
        }
    }

    pub fn subset_by_index_range(&self, range: &IndexRange) -> GridResult<GridAxis> {
        match self {
            GridAxis::Axis1D(axis) => axis.subset_by_index_range(range).map(GridAxis::Axis1D),
            GridAxis::Time(axis) => axis.subset_by_index_range(range).map(GridAxis::Time),
        }
    }

    pub fn subset_dependent(&self, independent: &GridAxis1D) -> GridResult<GridAxis> {
        match self {
            GridAxis::Axis1D(axis) => axis.subset_dependent(independent).map(GridAxis::Axis1D),
            GridAxis::Time(axis) => axis.subset_dependent(independent).map(GridAxis::Time),
        }
    }
}

impl From<GridAxis1D> for GridAxis {
    fn from(axis: GridAxis1D) -> Self {
        GridAxis::Axis1D(axis)
    }
}

impl From<GridAxis1DTime> for GridAxis {
    fn from(axis: GridAxis1DTime) -> Self {
        GridAxis::Time(axis)
    }
}

impl fmt::Display for GridAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridAxis::Axis1D(axis) => write!(f, "{}", axis),
            GridAxis::Time(axis) => write!(f, "{}", axis),
        }
    }
}
