//! Horizontal coordinate system: the X and Y axes of a grid.

use grid_common::{GridError, GridResult, IndexRange, MinMax};
use serde::Serialize;

use crate::axis::{AxisRole, AxisType};
use crate::axis1d::GridAxis1D;
use crate::helper::GridAxis1DHelper;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridHorizCoordinateSystem {
    x_axis: GridAxis1D,
    y_axis: GridAxis1D,
}

impl GridHorizCoordinateSystem {
    pub fn new(x_axis: GridAxis1D, y_axis: GridAxis1D) -> GridResult<Self> {
        check_role(&x_axis, AxisRole::X)?;
        check_role(&y_axis, AxisRole::Y)?;
        Ok(Self { x_axis, y_axis })
    }

    pub fn x_axis(&self) -> &GridAxis1D {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &GridAxis1D {
        &self.y_axis
    }

    /// True for a longitude/latitude grid.
    pub fn is_lat_lon(&self) -> bool {
        self.x_axis.axis_type() == Some(AxisType::Lon) && self.y_axis.axis_type() == Some(AxisType::Lat)
    }

    /// `[ny, nx]`
    pub fn shape(&self) -> [usize; 2] {
        [self.y_axis.ncoords(), self.x_axis.ncoords()]
    }

    pub fn x_edge_min_max(&self) -> MinMax {
        self.x_axis.coord_edge_min_max()
    }

    pub fn y_edge_min_max(&self) -> MinMax {
        self.y_axis.coord_edge_min_max()
    }

    /// `(x_index, y_index)` of the grid cell closest to `(x, y)`.
    pub fn find_xy_index(&self, x: f64, y: f64) -> GridResult<(usize, usize)> {
        let i = GridAxis1DHelper::new(&self.x_axis).find_closest(x)?;
        let j = GridAxis1DHelper::new(&self.y_axis).find_closest(y)?;
        Ok((i, j))
    }

    pub fn subset(&self, y_range: &IndexRange, x_range: &IndexRange) -> GridResult<Self> {
        Ok(Self {
            x_axis: self.x_axis.subset_by_index_range(x_range)?,
            y_axis: self.y_axis.subset_by_index_range(y_range)?,
        })
    }
}

fn check_role(axis: &GridAxis1D, role: AxisRole) -> GridResult<()> {
    match axis.axis_type() {
        Some(axis_type) if axis_type.role() == Some(role) => Ok(()),
        other => Err(GridError::invalid_argument(format!(
            "axis '{}' of type {:?} cannot be the {:?} axis",
            axis.name(),
            other,
            role
        ))),
    }
}
