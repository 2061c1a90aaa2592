//! Resolution and reading of formula-term variables.

use std::borrow::Cow;

use grid_common::{units, GridError, GridResult};
use ndarray::{Array2, ArrayD, Ix2};

use crate::dataset::{Dataset, IsMissing, Variable};
use crate::registry::TransformContext;

/// Resolves the formula terms of one transform against its dataset.
///
/// Every lookup fails eagerly: a term missing from `formula_terms` is
/// [`GridError::MissingFormulaTerm`], a term naming an absent variable is
/// [`GridError::UnresolvedFormulaTerm`].
pub(crate) struct TermReader<'a> {
    transform: &'a str,
    ctx: &'a TransformContext<'a>,
}

impl<'a> TermReader<'a> {
    pub fn new(transform: &'a str, ctx: &'a TransformContext<'a>) -> Self {
        Self { transform, ctx }
    }

    pub fn has_term(&self, term: &str) -> bool {
        self.ctx.formula_terms.contains(term)
    }

    pub fn variable(&self, term: &str) -> GridResult<&'a Variable> {
        let name = self.ctx.formula_terms.require(self.transform, term)?;
        self.ctx
            .dataset
            .find_variable(name)
            .ok_or_else(|| GridError::UnresolvedFormulaTerm {
                transform: self.transform.to_string(),
                term: term.to_string(),
                variable: name.to_string(),
            })
    }

    /// Read a 1D level term such as `s(k)` or `a(k)`, converted to `to` units.
    pub fn levels(&self, term: &str, to: Option<&str>) -> GridResult<Vec<f64>> {
        let var = self.variable(term)?;
        if var.rank() > 1 {
            return Err(GridError::ShapeMismatch {
                name: var.name().to_string(),
                expected: vec![var.shape().iter().product()],
                found: var.shape().to_vec(),
            });
        }
        let scale = self.unit_scale(term, var, to);
        let data = self.ctx.dataset.read(var.name())?;
        let missing = var.missing_values();
        Ok(data
            .iter()
            .map(|&v| if missing.is_missing(v) { f64::NAN } else { v * scale })
            .collect())
    }

    /// Read a single-valued term such as `depth_c` or `p0`, converted to `to` units.
    pub fn scalar(&self, term: &str, to: Option<&str>) -> GridResult<f64> {
        let values = self.levels(term, to)?;
        match values.as_slice() {
            [v] => Ok(*v),
            _ => Err(GridError::ShapeMismatch {
                name: self.variable(term)?.name().to_string(),
                expected: vec![1],
                found: vec![values.len()],
            }),
        }
    }

    /// Resolve a horizontal field term: `(y, x)` static or `(t, y, x)` time dependent.
    /// Static fields are read now; time dependent fields are read per evaluation.
    pub fn field(&self, term: &str, to: Option<&str>) -> GridResult<FieldTerm> {
        let var = self.variable(term)?;
        let scale = self.unit_scale(term, var, to);
        let (time_dependent, ntimes, shape) = match var.shape() {
            [ny, nx] => (false, 1, [*ny, *nx]),
            [nt, ny, nx] => (true, *nt, [*ny, *nx]),
            other => {
                return Err(GridError::ShapeMismatch {
                    name: var.name().to_string(),
                    expected: vec![0, 0],
                    found: other.to_vec(),
                })
            }
        };

        let mut field = FieldTerm {
            variable: var.clone(),
            time_dependent,
            ntimes,
            shape,
            scale,
            static_data: None,
        };
        if !time_dependent {
            let data = self.ctx.dataset.read(var.name())?;
            field.static_data = Some(field.clean(data)?);
        }
        Ok(field)
    }

    /// Factor converting a term's values into `to` units.
    pub fn unit_scale(&self, term: &str, var: &Variable, to: Option<&str>) -> f64 {
        let (Some(from), Some(to)) = (var.units(), to) else {
            return 1.0;
        };
        if from.trim() == to.trim() {
            return 1.0;
        }
        match units::conversion_factor(from, to) {
            Some(factor) if self.ctx.config.convert_term_units => {
                tracing::debug!(
                    transform = self.transform,
                    term,
                    from,
                    to,
                    factor,
                    "converting formula term units"
                );
                factor
            }
            Some(_) => {
                tracing::warn!(
                    transform = self.transform,
                    term,
                    from,
                    to,
                    "formula term units differ and conversion is disabled"
                );
                1.0
            }
            None => {
                tracing::warn!(
                    transform = self.transform,
                    term,
                    from,
                    to,
                    "formula term units are not convertible"
                );
                1.0
            }
        }
    }
}

/// A horizontal field term, `(y, x)` or `(t, y, x)`.
#[derive(Debug, Clone)]
pub(crate) struct FieldTerm {
    variable: Variable,
    time_dependent: bool,
    ntimes: usize,
    shape: [usize; 2],
    scale: f64,
    static_data: Option<Array2<f64>>,
}

impl FieldTerm {
    pub fn is_time_dependent(&self) -> bool {
        self.time_dependent
    }

    pub fn ntimes(&self) -> Option<usize> {
        self.time_dependent.then_some(self.ntimes)
    }

    /// `[ny, nx]`
    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    pub fn name(&self) -> &str {
        self.variable.name()
    }

    /// The field at one time step, missing values as NaN and converted units.
    pub fn load(&self, dataset: &dyn Dataset, time_index: usize) -> GridResult<Cow<'_, Array2<f64>>> {
        match &self.static_data {
            Some(data) => Ok(Cow::Borrowed(data)),
            None => {
                let data = dataset.read_time_slice(self.variable.name(), time_index)?;
                Ok(Cow::Owned(self.clean(data)?))
            }
        }
    }

    fn clean(&self, data: ArrayD<f64>) -> GridResult<Array2<f64>> {
        let found = data.shape().to_vec();
        let mut data = data
            .into_dimensionality::<Ix2>()
            .map_err(|_| GridError::ShapeMismatch {
                name: self.variable.name().to_string(),
                expected: self.shape.to_vec(),
                found: found.clone(),
            })?;
        if data.dim() != (self.shape[0], self.shape[1]) {
            return Err(GridError::ShapeMismatch {
                name: self.variable.name().to_string(),
                expected: self.shape.to_vec(),
                found,
            });
        }
        let scale = self.scale;
        let missing = self.variable.missing_values();
        data.mapv_inplace(|v| if missing.is_missing(v) { f64::NAN } else { v * scale });
        Ok(data)
    }
}

/// Number of time steps shared by the time dependent fields of a transform.
pub(crate) fn common_ntimes(transform: &str, fields: &[&FieldTerm]) -> GridResult<Option<usize>> {
    let mut ntimes: Option<usize> = None;
    for field in fields.iter().filter(|f| f.is_time_dependent()) {
        match ntimes {
            Some(n) if Some(n) != field.ntimes() => {
                return Err(GridError::invalid_argument(format!(
                    "{}: term '{}' has {} time steps, expected {}",
                    transform,
                    field.name(),
                    field.ntimes,
                    n
                )))
            }
            _ => ntimes = field.ntimes(),
        }
    }
    Ok(ntimes)
}

/// Check that all horizontal fields of a transform share one shape.
pub(crate) fn common_shape(fields: &[&FieldTerm]) -> GridResult<[usize; 2]> {
    let first = fields
        .first()
        .ok_or_else(|| GridError::invalid_argument("no horizontal field terms"))?;
    for field in &fields[1..] {
        if field.shape() != first.shape() {
            return Err(GridError::ShapeMismatch {
                name: field.name().to_string(),
                expected: first.shape().to_vec(),
                found: field.shape().to_vec(),
            });
        }
    }
    Ok(first.shape())
}
