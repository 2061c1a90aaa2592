//! Ocean sigma coordinate.

use grid_common::GridResult;
use ndarray::{Array1, Array3};

use super::{check_length_unit, log_construction, TransformBase};
use crate::registry::TransformContext;
use crate::terms::{common_ntimes, common_shape, FieldTerm, TermReader};
use crate::transform::{VerticalTransform, VerticalTransformType};

/// `z(n,k,j,i) = eta(n,j,i) + sigma(k) * (depth(j,i) + eta(n,j,i))`, in the
/// units of `depth`.
#[derive(Debug)]
pub struct OceanSigma {
    base: TransformBase,
    sigma: Vec<f64>,
    eta: FieldTerm,
    depth: FieldTerm,
}

impl OceanSigma {
    pub const TERMS: &'static [&'static str] = &["sigma", "eta", "depth"];

    pub fn from_context(ctx: &TransformContext<'_>) -> GridResult<Self> {
        let kind = VerticalTransformType::OceanSigma.type_name();
        let terms = TermReader::new(kind, ctx);

        let depth_unit = terms.variable("depth")?.units();
        check_length_unit(kind, "depth", depth_unit);
        let depth = terms.field("depth", None)?;
        let eta = terms.field("eta", depth_unit)?;
        let sigma = terms.levels("sigma", None)?;

        let shape = common_shape(&[&eta, &depth])?;
        let ntimes = common_ntimes(kind, &[&eta, &depth])?;
        log_construction(kind, ctx.name, &[&eta, &depth], ntimes);
        Ok(Self {
            base: TransformBase::new(ctx, sigma.len(), shape, ntimes, depth_unit.map(str::to_string)),
            sigma,
            eta,
            depth,
        })
    }

    fn height(&self, k: usize, eta: f64, depth: f64) -> f64 {
        eta + self.sigma[k] * (depth + eta)
    }
}

impl VerticalTransform for OceanSigma {
    delegate_to_base!(VerticalTransformType::OceanSigma);

    fn coordinate_array(&self, time_index: usize) -> GridResult<Array3<f64>> {
        let t = self.base.time_index(time_index)?;
        tracing::trace!(transform = self.base.name(), time_index = t, "evaluating");
        let eta = self.eta.load(self.base.dataset(), t)?;
        let depth = self.depth.load(self.base.dataset(), t)?;
        Ok(self
            .base
            .fill_3d(|k, j, i| self.height(k, eta[[j, i]], depth[[j, i]])))
    }

    fn coordinate_array_1d(
        &self,
        time_index: usize,
        x_index: usize,
        y_index: usize,
    ) -> GridResult<Array1<f64>> {
        self.base.check_point(x_index, y_index)?;
        let t = self.base.time_index(time_index)?;
        let eta = self.eta.load(self.base.dataset(), t)?[[y_index, x_index]];
        let depth = self.depth.load(self.base.dataset(), t)?[[y_index, x_index]];
        Ok(self.base.fill_1d(|k| self.height(k, eta, depth)))
    }
}
