//! Concrete vertical transforms, one per formula.

/// The [`VerticalTransform`](crate::VerticalTransform) methods every concrete
/// transform answers from its `base` field.
macro_rules! delegate_to_base {
    ($kind:expr) => {
        fn name(&self) -> &str {
            self.base.name()
        }

        fn transform_type(&self) -> $crate::transform::VerticalTransformType {
            $kind
        }

        fn unit_string(&self) -> Option<&str> {
            self.base.unit()
        }

        fn is_time_dependent(&self) -> bool {
            self.base.ntimes().is_some()
        }

        fn num_times(&self) -> Option<usize> {
            self.base.ntimes()
        }

        fn shape(&self) -> [usize; 3] {
            self.base.shape()
        }

        fn subset(
            self: ::std::sync::Arc<Self>,
            t_range: Option<::grid_common::IndexRange>,
            z_range: Option<::grid_common::IndexRange>,
            y_range: Option<::grid_common::IndexRange>,
            x_range: Option<::grid_common::IndexRange>,
        ) -> ::grid_common::GridResult<::std::sync::Arc<dyn $crate::transform::VerticalTransform>> {
            $crate::subset::subset_transform(self, t_range, z_range, y_range, x_range)
        }
    };
}

mod atmos_sigma;
mod existing_field;
mod hybrid_height;
mod hybrid_sigma_pressure;
mod ocean_s;
mod ocean_sg1;
mod ocean_sg2;
mod ocean_sigma;

pub use atmos_sigma::AtmosSigma;
pub use existing_field::Existing3DField;
pub use hybrid_height::HybridHeight;
pub use hybrid_sigma_pressure::HybridSigmaPressure;
pub use ocean_s::OceanS;
pub use ocean_sg1::OceanSG1;
pub use ocean_sg2::OceanSG2;
pub use ocean_sigma::OceanSigma;

use std::fmt;
use std::sync::Arc;

use grid_common::{units, GridResult, SimpleUnit, UnitKind};
use ndarray::{Array1, Array3};

use crate::config::VerticalTransformConfig;
use crate::dataset::Dataset;
use crate::registry::TransformContext;
use crate::terms::FieldTerm;
use crate::transform::{check_point, effective_time_index};

/// State every concrete transform carries: identity, extent, time steps and
/// the dataset time dependent terms are read from.
pub(crate) struct TransformBase {
    name: String,
    unit: Option<String>,
    shape: [usize; 3],
    ntimes: Option<usize>,
    strict_time_index: bool,
    dataset: Arc<dyn Dataset>,
}

impl TransformBase {
    pub fn new(
        ctx: &TransformContext<'_>,
        nz: usize,
        horiz: [usize; 2],
        ntimes: Option<usize>,
        unit: Option<String>,
    ) -> Self {
        Self {
            name: ctx.name.to_string(),
            unit,
            shape: [nz, horiz[0], horiz[1]],
            ntimes,
            strict_time_index: ctx.config.strict_time_index,
            dataset: Arc::clone(&ctx.dataset),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn ntimes(&self) -> Option<usize> {
        self.ntimes
    }

    pub fn dataset(&self) -> &dyn Dataset {
        self.dataset.as_ref()
    }

    /// Index to read time dependent terms at.
    pub fn time_index(&self, time_index: usize) -> GridResult<usize> {
        effective_time_index(time_index, self.ntimes, self.strict_time_index)
    }

    pub fn check_point(&self, x_index: usize, y_index: usize) -> GridResult<()> {
        check_point(self.shape, x_index, y_index)
    }

    /// Fill a `[z, y, x]` array from `f(k, j, i)`.
    pub fn fill_3d(&self, f: impl Fn(usize, usize, usize) -> f64) -> Array3<f64> {
        let [nz, ny, nx] = self.shape;
        Array3::from_shape_fn((nz, ny, nx), |(k, j, i)| f(k, j, i))
    }

    /// Fill a `[z]` column from `f(k)`.
    pub fn fill_1d(&self, f: impl Fn(usize) -> f64) -> Array1<f64> {
        Array1::from_shape_fn(self.shape[0], f)
    }
}

impl fmt::Debug for TransformBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformBase")
            .field("name", &self.name)
            .field("unit", &self.unit)
            .field("shape", &self.shape)
            .field("ntimes", &self.ntimes)
            .finish_non_exhaustive()
    }
}

/// Output unit and scale of a pressure transform whose terms are in `ps_unit`.
///
/// `output_pressure_unit` from the configuration wins when a factor to it is
/// known; otherwise the transform reports in the surface pressure unit.
pub(crate) fn pressure_output(
    transform: &str,
    ps_unit: Option<&str>,
    config: &VerticalTransformConfig,
) -> (Option<String>, f64) {
    let Some(target) = config.output_pressure_unit.as_deref() else {
        return (ps_unit.map(str::to_string), 1.0);
    };
    let from = ps_unit.unwrap_or("Pa");
    match units::conversion_factor(from, target) {
        Some(factor) => (Some(target.to_string()), factor),
        None => {
            tracing::warn!(
                transform,
                from,
                to = target,
                "cannot convert pressure output, keeping surface pressure units"
            );
            (ps_unit.map(str::to_string), 1.0)
        }
    }
}

/// Warn when a height transform's reference term is not a length.
pub(crate) fn check_length_unit(transform: &str, term: &str, unit: Option<&str>) {
    if let Some(unit) = unit {
        let is_length = SimpleUnit::parse(unit).is_some_and(|u| u.kind() == UnitKind::Length);
        if !is_length {
            tracing::warn!(transform, term, unit, "reference term is not a length unit");
        }
    }
}

/// Log the resolved terms and time dependence of a new transform.
pub(crate) fn log_construction(kind: &str, name: &str, fields: &[&FieldTerm], ntimes: Option<usize>) {
    let terms: Vec<&str> = fields.iter().map(|f| f.name()).collect();
    tracing::debug!(
        transform = kind,
        name,
        fields = ?terms,
        time_dependent = ntimes.is_some(),
        ntimes = ?ntimes,
        "constructed vertical transform"
    );
}
