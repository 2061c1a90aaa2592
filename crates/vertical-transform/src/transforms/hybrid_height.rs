//! Atmosphere hybrid height coordinate.

use grid_common::{GridError, GridResult};
use ndarray::{Array1, Array3};

use super::{check_length_unit, log_construction, TransformBase};
use crate::registry::TransformContext;
use crate::terms::{FieldTerm, TermReader};
use crate::transform::{VerticalTransform, VerticalTransformType};

/// `z(k,j,i) = a(k) + b(k) * orog(j,i)`, in the units of `a`.
#[derive(Debug)]
pub struct HybridHeight {
    base: TransformBase,
    a: Vec<f64>,
    b: Vec<f64>,
    orog: FieldTerm,
}

impl HybridHeight {
    pub const TERMS: &'static [&'static str] = &["a", "b", "orog"];

    pub fn from_context(ctx: &TransformContext<'_>) -> GridResult<Self> {
        let kind = VerticalTransformType::HybridHeight.type_name();
        let terms = TermReader::new(kind, ctx);

        let a_unit = terms.variable("a")?.units();
        check_length_unit(kind, "a", a_unit);
        let a = terms.levels("a", None)?;
        let b = terms.levels("b", None)?;
        if a.len() != b.len() {
            return Err(GridError::ShapeMismatch {
                name: terms.variable("b")?.name().to_string(),
                expected: vec![a.len()],
                found: vec![b.len()],
            });
        }
        let orog = terms.field("orog", a_unit)?;

        let ntimes = orog.ntimes();
        log_construction(kind, ctx.name, &[&orog], ntimes);
        Ok(Self {
            base: TransformBase::new(ctx, a.len(), orog.shape(), ntimes, a_unit.map(str::to_string)),
            a,
            b,
            orog,
        })
    }

    fn height(&self, k: usize, orog: f64) -> f64 {
        self.a[k] + self.b[k] * orog
    }
}

impl VerticalTransform for HybridHeight {
    delegate_to_base!(VerticalTransformType::HybridHeight);

    fn coordinate_array(&self, time_index: usize) -> GridResult<Array3<f64>> {
        let t = self.base.time_index(time_index)?;
        tracing::trace!(transform = self.base.name(), time_index = t, "evaluating");
        let orog = self.orog.load(self.base.dataset(), t)?;
        Ok(self.base.fill_3d(|k, j, i| self.height(k, orog[[j, i]])))
    }

    fn coordinate_array_1d(
        &self,
        time_index: usize,
        x_index: usize,
        y_index: usize,
    ) -> GridResult<Array1<f64>> {
        self.base.check_point(x_index, y_index)?;
        let t = self.base.time_index(time_index)?;
        let orog = self.orog.load(self.base.dataset(), t)?[[y_index, x_index]];
        Ok(self.base.fill_1d(|k| self.height(k, orog)))
    }
}
