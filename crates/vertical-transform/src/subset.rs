//! Index-range views over another vertical transform.

use std::sync::Arc;

use grid_common::{GridError, GridResult, IndexRange};
use ndarray::{Array1, Array3};

use crate::transform::{VerticalTransform, VerticalTransformType};

/// A vertical transform restricted to index ranges of another transform.
///
/// Evaluation maps the requested time index through the time range, evaluates
/// the wrapped transform, and keeps only the selected `z`, `y` and `x`
/// indices. Subsetting a subset composes the ranges, so the wrapped transform
/// is always the original one.
#[derive(Debug)]
pub struct VerticalTransformSubset {
    inner: Arc<dyn VerticalTransform>,
    t_range: Option<IndexRange>,
    z_range: IndexRange,
    y_range: IndexRange,
    x_range: IndexRange,
}

impl VerticalTransformSubset {
    /// Wrap `inner`. `None` leaves a dimension unrestricted.
    ///
    /// A time range on a transform that is not time dependent is dropped.
    pub fn new(
        inner: Arc<dyn VerticalTransform>,
        t_range: Option<IndexRange>,
        z_range: Option<IndexRange>,
        y_range: Option<IndexRange>,
        x_range: Option<IndexRange>,
    ) -> GridResult<Self> {
        let [nz, ny, nx] = inner.shape();
        let z_range = restrict(z_range, nz)?;
        let y_range = restrict(y_range, ny)?;
        let x_range = restrict(x_range, nx)?;

        let t_range = match (inner.num_times(), t_range) {
            (Some(ntimes), Some(range)) => {
                range.check_within(ntimes)?;
                Some(range)
            }
            (None, Some(range)) => {
                tracing::debug!(
                    transform = inner.name(),
                    range = %range,
                    "ignoring time range on a transform that is not time dependent"
                );
                None
            }
            (_, None) => None,
        };

        Ok(Self {
            inner,
            t_range,
            z_range,
            y_range,
            x_range,
        })
    }

    /// The wrapped transform.
    pub fn inner(&self) -> &Arc<dyn VerticalTransform> {
        &self.inner
    }

    pub fn t_range(&self) -> Option<&IndexRange> {
        self.t_range.as_ref()
    }

    pub fn z_range(&self) -> &IndexRange {
        &self.z_range
    }

    pub fn y_range(&self) -> &IndexRange {
        &self.y_range
    }

    pub fn x_range(&self) -> &IndexRange {
        &self.x_range
    }

    fn inner_time_index(&self, time_index: usize) -> GridResult<usize> {
        match &self.t_range {
            Some(range) => range
                .element(time_index)
                .map_err(|_| GridError::InvalidTimeIndex {
                    index: time_index,
                    ntimes: range.len(),
                }),
            None => Ok(time_index),
        }
    }
}

fn restrict(range: Option<IndexRange>, n: usize) -> GridResult<IndexRange> {
    match range {
        Some(range) => {
            range.check_within(n)?;
            Ok(range)
        }
        None => Ok(IndexRange::make(None, n)),
    }
}

fn compose(current: &IndexRange, sub: Option<IndexRange>) -> GridResult<IndexRange> {
    match sub {
        Some(sub) => current.compose(&sub),
        None => Ok(current.clone()),
    }
}

impl VerticalTransform for VerticalTransformSubset {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn transform_type(&self) -> VerticalTransformType {
        self.inner.transform_type()
    }

    fn coordinate_array(&self, time_index: usize) -> GridResult<Array3<f64>> {
        let full = self.inner.coordinate_array(self.inner_time_index(time_index)?)?;

        let zs: Vec<usize> = self.z_range.iter().collect();
        let ys: Vec<usize> = self.y_range.iter().collect();
        let xs: Vec<usize> = self.x_range.iter().collect();
        Ok(Array3::from_shape_fn((zs.len(), ys.len(), xs.len()), |(k, j, i)| {
            full[[zs[k], ys[j], xs[i]]]
        }))
    }

    fn coordinate_array_1d(
        &self,
        time_index: usize,
        x_index: usize,
        y_index: usize,
    ) -> GridResult<Array1<f64>> {
        let x = self.x_range.element(x_index)?;
        let y = self.y_range.element(y_index)?;
        let column = self
            .inner
            .coordinate_array_1d(self.inner_time_index(time_index)?, x, y)?;
        Ok(self.z_range.iter().map(|k| column[k]).collect())
    }

    fn unit_string(&self) -> Option<&str> {
        self.inner.unit_string()
    }

    fn is_time_dependent(&self) -> bool {
        self.inner.is_time_dependent()
    }

    fn num_times(&self) -> Option<usize> {
        match &self.t_range {
            Some(range) => Some(range.len()),
            None => self.inner.num_times(),
        }
    }

    fn shape(&self) -> [usize; 3] {
        [self.z_range.len(), self.y_range.len(), self.x_range.len()]
    }

    fn subset(
        self: Arc<Self>,
        t_range: Option<IndexRange>,
        z_range: Option<IndexRange>,
        y_range: Option<IndexRange>,
        x_range: Option<IndexRange>,
    ) -> GridResult<Arc<dyn VerticalTransform>> {
        let t_range = match (t_range, &self.t_range) {
            (Some(sub), Some(current)) => Some(current.compose(&sub)?),
            (sub, current) => sub.or_else(|| current.clone()),
        };
        let subset = VerticalTransformSubset::new(
            Arc::clone(&self.inner),
            t_range,
            Some(compose(&self.z_range, z_range)?),
            Some(compose(&self.y_range, y_range)?),
            Some(compose(&self.x_range, x_range)?),
        )?;
        Ok(Arc::new(subset))
    }
}

/// Subset any concrete transform. Concrete transforms forward their
/// [`VerticalTransform::subset`] here.
pub(crate) fn subset_transform(
    inner: Arc<dyn VerticalTransform>,
    t_range: Option<IndexRange>,
    z_range: Option<IndexRange>,
    y_range: Option<IndexRange>,
    x_range: Option<IndexRange>,
) -> GridResult<Arc<dyn VerticalTransform>> {
    Ok(Arc::new(VerticalTransformSubset::new(
        inner, t_range, z_range, y_range, x_range,
    )?))
}
