//! Ocean S-coordinate, generic form 1.

use grid_common::{GridError, GridResult};
use ndarray::{Array1, Array3};

use super::{check_length_unit, log_construction, TransformBase};
use crate::registry::TransformContext;
use crate::terms::{common_ntimes, common_shape, FieldTerm, TermReader};
use crate::transform::{VerticalTransform, VerticalTransformType};

/// ```text
/// z(n,k,j,i) = S(k,j,i) + eta(n,j,i) * (1 + S(k,j,i) / depth(j,i))
/// S(k,j,i) = depth_c * s(k) + (depth(j,i) - depth_c) * C(k)
/// ```
///
/// Unlike [`OceanS`](super::OceanS) the stretching `C(k)` is read from the
/// dataset instead of being computed.
#[derive(Debug)]
pub struct OceanSG1 {
    base: TransformBase,
    s: Vec<f64>,
    c: Vec<f64>,
    depth_c: f64,
    eta: FieldTerm,
    depth: FieldTerm,
}

impl OceanSG1 {
    pub const TERMS: &'static [&'static str] = &["s", "C", "eta", "depth", "depth_c"];

    pub fn from_context(ctx: &TransformContext<'_>) -> GridResult<Self> {
        let kind = VerticalTransformType::OceanSG1.type_name();
        let terms = TermReader::new(kind, ctx);

        let depth_unit = terms.variable("depth")?.units();
        check_length_unit(kind, "depth", depth_unit);
        let depth = terms.field("depth", None)?;
        let eta = terms.field("eta", depth_unit)?;
        let s = terms.levels("s", None)?;
        let c = terms.levels("C", None)?;
        if c.len() != s.len() {
            return Err(GridError::ShapeMismatch {
                name: terms.variable("C")?.name().to_string(),
                expected: vec![s.len()],
                found: vec![c.len()],
            });
        }
        let depth_c = terms.scalar("depth_c", depth_unit)?;

        let shape = common_shape(&[&eta, &depth])?;
        let ntimes = common_ntimes(kind, &[&eta, &depth])?;
        log_construction(kind, ctx.name, &[&eta, &depth], ntimes);
        Ok(Self {
            base: TransformBase::new(ctx, s.len(), shape, ntimes, depth_unit.map(str::to_string)),
            s,
            c,
            depth_c,
            eta,
            depth,
        })
    }

    fn height(&self, k: usize, eta: f64, depth: f64) -> f64 {
        let s = self.depth_c * self.s[k] + (depth - self.depth_c) * self.c[k];
        s + eta * (1.0 + s / depth)
    }
}

impl VerticalTransform for OceanSG1 {
    delegate_to_base!(VerticalTransformType::OceanSG1);

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
