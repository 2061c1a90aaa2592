//! The vertical transform trait.

use std::fmt;
use std::sync::Arc;

use grid_common::{GridError, GridResult, IndexRange};
use ndarray::{Array1, Array3};
use serde::{Deserialize, Serialize};

/// A transformation from a model-native vertical coordinate to a physical
/// vertical coordinate such as height or pressure.
///
/// Every evaluation allocates a new array that the caller owns; nothing is
/// cached between calls, so different time indices can be evaluated
/// concurrently from several threads. Evaluation may block on reads from
/// the underlying dataset.
pub trait VerticalTransform: Send + Sync + fmt::Debug {
    /// Name of the transform, usually taken from the vertical coordinate.
    fn name(&self) -> &str;

    /// Which formula this transform evaluates.
    fn transform_type(&self) -> VerticalTransformType;

    /// The 3D vertical coordinate for one time step, in canonical `[z, y, x]` order.
    ///
    /// `time_index` is ignored when the transform is not time dependent.
    /// For a time dependent transform an out of bounds index is
    /// [`GridError::InvalidTimeIndex`].
    fn coordinate_array(&self, time_index: usize) -> GridResult<Array3<f64>>;

    /// The vertical profile `[z]` at a single horizontal grid point.
    fn coordinate_array_1d(
        &self,
        time_index: usize,
        x_index: usize,
        y_index: usize,
    ) -> GridResult<Array1<f64>>;

    /// Unit of the computed coordinate.
    fn unit_string(&self) -> Option<&str>;

    /// Fixed at construction.
    fn is_time_dependent(&self) -> bool;

    /// Number of time steps, or `None` if not time dependent.
    fn num_times(&self) -> Option<usize>;

    /// Shape of [`coordinate_array`](Self::coordinate_array) as `[nz, ny, nx]`.
    fn shape(&self) -> [usize; 3];

    /// A new transform restricted to the given index ranges. `None` leaves a
    /// dimension unrestricted.
    fn subset(
        self: Arc<Self>,
        t_range: Option<IndexRange>,
        z_range: Option<IndexRange>,
        y_range: Option<IndexRange>,
        x_range: Option<IndexRange>,
    ) -> GridResult<Arc<dyn VerticalTransform>>;
}

/// The formulas this crate knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalTransformType {
    AtmosSigma,
    HybridSigmaPressure,
    HybridHeight,
    OceanSigma,
    OceanS,
    OceanSG1,
    OceanSG2,
    Existing3DField,
}

impl VerticalTransformType {
    pub const ALL: [VerticalTransformType; 8] = [
        Self::AtmosSigma,
        Self::HybridSigmaPressure,
        Self::HybridHeight,
        Self::OceanSigma,
        Self::OceanS,
        Self::OceanSG1,
        Self::OceanSG2,
        Self::Existing3DField,
    ];

    /// CF `standard_name` of the vertical coordinate.
    pub fn standard_name(&self) -> &'static str {
        match self {
            Self::AtmosSigma => "atmosphere_sigma_coordinate",
            Self::HybridSigmaPressure => "atmosphere_hybrid_sigma_pressure_coordinate",
            Self::HybridHeight => "atmosphere_hybrid_height_coordinate",
            Self::OceanSigma => "ocean_sigma_coordinate",
            Self::OceanS => "ocean_s_coordinate",
            Self::OceanSG1 => "ocean_s_coordinate_g1",
            Self::OceanSG2 => "ocean_s_coordinate_g2",
            Self::Existing3DField => "existing3DField",
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::AtmosSigma => "AtmosSigma",
            Self::HybridSigmaPressure => "HybridSigmaPressure",
            Self::HybridHeight => "HybridHeight",
            Self::OceanSigma => "OceanSigma",
            Self::OceanS => "OceanS",
            Self::OceanSG1 => "OceanSG1",
            Self::OceanSG2 => "OceanSG2",
            Self::Existing3DField => "Existing3DField",
        }
    }

    /// Look up by CF `standard_name` only.
    pub fn from_standard_name(standard_name: &str) -> Option<Self> {
        let name = standard_name.trim();
        Self::ALL.into_iter().find(|t| t.standard_name() == name)
    }

    /// Look up by CF standard name or type name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|t| {
            t.standard_name().eq_ignore_ascii_case(name) || t.type_name().eq_ignore_ascii_case(name)
        })
    }

    /// True for transforms producing pressure rather than height.
    pub fn is_pressure(&self) -> bool {
        matches!(self, Self::AtmosSigma | Self::HybridSigmaPressure)
    }
}

impl fmt::Display for VerticalTransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Map a requested time index to the index actually read.
///
/// Transforms that are not time dependent ignore the index (always 0)
/// unless `strict` is set, in which case anything but 0 is rejected.
pub(crate) fn effective_time_index(
    time_index: usize,
    ntimes: Option<usize>,
    strict: bool,
) -> GridResult<usize> {
    match ntimes {
        Some(n) if time_index >= n => Err(GridError::InvalidTimeIndex {
            index: time_index,
            ntimes: n,
        }),
        Some(_) => Ok(time_index),
        None if strict && time_index != 0 => Err(GridError::InvalidTimeIndex {
            index: time_index,
            ntimes: 1,
        }),
        None => Ok(0),
    }
}

/// Check a horizontal point against the transform extent.
pub(crate) fn check_point(shape: [usize; 3], x_index: usize, y_index: usize) -> GridResult<()> {
    let [_, ny, nx] = shape;
    if x_index >= nx {
        return Err(GridError::IndexOutOfRange {
            index: x_index,
            len: nx,
        });
    }
    if y_index >= ny {
        return Err(GridError::IndexOutOfRange {
            index: y_index,
            len: ny,
        });
    }
    Ok(())
}
