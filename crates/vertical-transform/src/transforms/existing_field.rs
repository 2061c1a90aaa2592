//! Vertical coordinate stored directly as a 3D field.

use grid_common::attributes::names;
use grid_common::{GridError, GridResult};
use ndarray::{Array1, Array3, ArrayD, Ix3};

use super::TransformBase;
use crate::dataset::{IsMissing, Variable};
use crate::registry::TransformContext;
use crate::transform::{VerticalTransform, VerticalTransformType};

/// Returns the values of an existing `(z, y, x)` or `(t, z, y, x)` variable,
/// named by the `existingDataField` attribute of the vertical coordinate.
#[derive(Debug)]
pub struct Existing3DField {
    base: TransformBase,
    variable: Variable,
    static_data: Option<Array3<f64>>,
}

impl Existing3DField {
    pub fn from_context(ctx: &TransformContext<'_>) -> GridResult<Self> {
        let kind = VerticalTransformType::Existing3DField.type_name();
        let field_name = ctx
            .attributes
            .text(names::EXISTING_DATA_FIELD)
            .ok_or_else(|| GridError::MissingFormulaTerm {
                transform: kind.to_string(),
                term: names::EXISTING_DATA_FIELD.to_string(),
            })?;
        let variable = ctx
            .dataset
            .find_variable(field_name)
            .ok_or_else(|| GridError::UnresolvedFormulaTerm {
                transform: kind.to_string(),
                term: names::EXISTING_DATA_FIELD.to_string(),
                variable: field_name.to_string(),
            })?
            .clone();

        let (ntimes, shape) = match *variable.shape() {
            [nz, ny, nx] => (None, [nz, ny, nx]),
            [nt, nz, ny, nx] => (Some(nt), [nz, ny, nx]),
            _ => {
                return Err(GridError::ShapeMismatch {
                    name: variable.name().to_string(),
                    expected: vec![0, 0, 0],
                    found: variable.shape().to_vec(),
                })
            }
        };

        let unit = variable.units().map(str::to_string);
        let base = TransformBase::new(ctx, shape[0], [shape[1], shape[2]], ntimes, unit);
        let mut field = Self {
            base,
            variable,
            static_data: None,
        };
        if ntimes.is_none() {
            let data = ctx.dataset.read(field.variable.name())?;
            field.static_data = Some(field.clean(data)?);
        }

        tracing::debug!(
            transform = kind,
            name = ctx.name,
            field = field.variable.name(),
            time_dependent = ntimes.is_some(),
            "constructed vertical transform"
        );
        Ok(field)
    }

    fn clean(&self, data: ArrayD<f64>) -> GridResult<Array3<f64>> {
        let expected = self.base.shape();
        let found = data.shape().to_vec();
        let mut data = data
            .into_dimensionality::<Ix3>()
            .map_err(|_| GridError::ShapeMismatch {
                name: self.variable.name().to_string(),
                expected: expected.to_vec(),
                found: found.clone(),
            })?;
        if data.dim() != (expected[0], expected[1], expected[2]) {
            return Err(GridError::ShapeMismatch {
                name: self.variable.name().to_string(),
                expected: expected.to_vec(),
                found,
            });
        }
        let missing = self.variable.missing_values();
        if missing.has_missing() {
            data.mapv_inplace(|v| if missing.is_missing(v) { f64::NAN } else { v });
        }
        Ok(data)
    }

    fn load(&self, time_index: usize) -> GridResult<Array3<f64>> {
        let t = self.base.time_index(time_index)?;
        tracing::trace!(transform = self.base.name(), time_index = t, "evaluating");
        match &self.static_data {
            Some(data) => Ok(data.clone()),
            None => {
                let data = self
                    .base
                    .dataset()
                    .read_time_slice(self.variable.name(), t)?;
                self.clean(data)
            }
        }
    }
}

impl VerticalTransform for Existing3DField {
    delegate_to_base!(VerticalTransformType::Existing3DField);

    fn coordinate_array(&self, time_index: usize) -> GridResult<Array3<f64>> {
        self.load(time_index)
    }

    fn coordinate_array_1d(
        &self,
        time_index: usize,
        x_index: usize,
        y_index: usize,
    ) -> GridResult<Array1<f64>> {
        self.base.check_point(x_index, y_index)?;
        let data = self.load(time_index)?;
        Ok(data.slice(ndarray::s![.., y_index, x_index]).to_owned())
    }
}
