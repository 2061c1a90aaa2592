//! Atmosphere hybrid sigma-pressure coordinate.

use grid_common::{GridError, GridResult};
use ndarray::{Array1, Array3};

use super::{log_construction, pressure_output, TransformBase};
use crate::registry::TransformContext;
use crate::terms::{FieldTerm, TermReader};
use crate::transform::{VerticalTransform, VerticalTransformType};

/// `p(n,k,j,i) = a(k) * p0 + b(k) * ps(n,j,i)` or, when the dataset carries
/// the product directly, `p(n,k,j,i) = ap(k) + b(k) * ps(n,j,i)`.
///
/// The pressure offset `a * p0` (or `ap`) is converted into `ps` units at
/// construction, so datasets mixing hPa and Pa terms evaluate correctly.
#[derive(Debug)]
pub struct HybridSigmaPressure {
    base: TransformBase,
    /// `a(k) * p0` or `ap(k)`, in `ps` units.
    ap: Vec<f64>,
    b: Vec<f64>,
    ps: FieldTerm,
    out_scale: f64,
}

impl HybridSigmaPressure {
    pub const TERMS: &'static [&'static str] = &["a", "b", "ps", "p0"];
    pub const TERMS_AP: &'static [&'static str] = &["ap", "b", "ps"];

    pub fn from_context(ctx: &TransformContext<'_>) -> GridResult<Self> {
        let kind = VerticalTransformType::HybridSigmaPressure.type_name();
        let terms = TermReader::new(kind, ctx);

        let ps = terms.field("ps", None)?;
        let ps_unit = terms.variable("ps")?.units();
        let b = terms.levels("b", None)?;
        let ap = if terms.has_term("ap") {
            terms.levels("ap", ps_unit)?
        } else {
            let p0 = terms.scalar("p0", ps_unit)?;
            terms.levels("a", None)?.into_iter().map(|a| a * p0).collect()
        };
        if ap.len() != b.len() {
            return Err(GridError::ShapeMismatch {
                name: terms.variable("b")?.name().to_string(),
                expected: vec![ap.len()],
                found: vec![b.len()],
            });
        }
        let (unit, out_scale) = pressure_output(kind, ps_unit, ctx.config);

        let ntimes = ps.ntimes();
        log_construction(kind, ctx.name, &[&ps], ntimes);
        Ok(Self {
            base: TransformBase::new(ctx, b.len(), ps.shape(), ntimes, unit),
            ap,
            b,
            ps,
            out_scale,
        })
    }

    fn pressure(&self, k: usize, ps: f64) -> f64 {
        (self.ap[k] + self.b[k] * ps) * self.out_scale
    }
}

impl VerticalTransform for HybridSigmaPressure {
    delegate_to_base!(VerticalTransformType::HybridSigmaPressure);

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
