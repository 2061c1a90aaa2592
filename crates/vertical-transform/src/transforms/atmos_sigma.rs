//! Atmosphere sigma coordinate.

use grid_common::GridResult;
use ndarray::{Array1, Array3};

use super::{log_construction, pressure_output, TransformBase};
use crate::registry::TransformContext;
use crate::terms::{FieldTerm, TermReader};
use crate::transform::{VerticalTransform, VerticalTransformType};

/// `p(n,k,j,i) = ptop + sigma(k) * (ps(n,j,i) - ptop)`
///
/// Output is in the units of `ps`; `ptop` is converted into them.
#[derive(Debug)]
pub struct AtmosSigma {
    base: TransformBase,
    sigma: Vec<f64>,
    ps: FieldTerm,
    ptop: f64,
    out_scale: f64,
}

impl AtmosSigma {
    pub const TERMS: &'static [&'static str] = &["sigma", "ps", "ptop"];

    pub fn from_context(ctx: &TransformContext<'_>) -> GridResult<Self> {
        let kind = VerticalTransformType::AtmosSigma.type_name();
        let terms = TermReader::new(kind, ctx);

        let ps = terms.field("ps", None)?;
        let ps_unit = terms.variable("ps")?.units();
        let sigma = terms.levels("sigma", None)?;
        let ptop = terms.scalar("ptop", ps_unit)?;
        let (unit, out_scale) = pressure_output(kind, ps_unit, ctx.config);

        let ntimes = ps.ntimes();
        log_construction(kind, ctx.name, &[&ps], ntimes);
        Ok(Self {
            base: TransformBase::new(ctx, sigma.len(), ps.shape(), ntimes, unit),
            sigma,
            ps,
            ptop,
            out_scale,
        })
    }

    fn pressure(&self, k: usize, ps: f64) -> f64 {
        (self.ptop + self.sigma[k] * (ps - self.ptop)) * self.out_scale
    }
}

impl VerticalTransform for AtmosSigma {
    delegate_to_base!(VerticalTransformType::AtmosSigma);

    fn coordinate_array(&self, time_index: usize) -> GridResult<Array3<f64>> {
        let t = self.base.time_index(time_index)?;
        tracing::trace!(transform = self.base.name(), time_index = t, "evaluating");
        let ps = self.ps.load(self.base.dataset(), t)?;
        Ok(self.base.fill_3d(|k, j, i| self.pressure(k, ps[[j, i]])))
    }

    fn coordinate_array_1d(
        &self,
        time_index: usize,
        x_index: usize,
        y_index: usize,
    ) -> GridResult<Array1<f64>> {
        self.base.check_point(x_index, y_index)?;
        let t = self.base.time_index(time_index)?;
        let ps = self.ps.load(self.base.dataset(), t)?[[y_index, x_index]];
        Ok(self.base.fill_1d(|k| self.pressure(k, ps)))
    }
}
