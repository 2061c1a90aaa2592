//! Grid coordinate systems.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use grid_common::{GridError, GridResult, IndexRange};
use vertical_transform::VerticalTransform;

use crate::axis::{AxisRole, DependenceType, GridAxis};
use crate::axis1d::GridAxis1D;
use crate::horiz::GridHorizCoordinateSystem;
use crate::subset::GridSubset;
use crate::time_axis::GridAxis1DTime;

/// The axes of a gridded variable, at most one per role, with an optional
/// vertical transform.
///
/// X and Y axes are always present. Time and RunTime roles are filled by
/// [`GridAxis1DTime`] axes.
#[derive(Debug, Clone)]
pub struct GridCoordinateSystem {
    name: String,
    axes: Vec<GridAxis>,
    roles: BTreeMap<AxisRole, usize>,
    horiz: GridHorizCoordinateSystem,
    vertical_transform: Option<Arc<dyn VerticalTransform>>,
}

impl GridCoordinateSystem {
    pub fn builder() -> GridCoordinateSystemBuilder {
        GridCoordinateSystemBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All axes, in the order they were added.
    pub fn grid_axes(&self) -> &[GridAxis] {
        &self.axes
    }

    pub fn find_axis(&self, name: &str) -> Option<&GridAxis> {
        self.axes.iter().find(|a| a.name() == name)
    }

    fn role_axis(&self, role: AxisRole) -> Option<&GridAxis> {
        self.roles.get(&role).map(|&i| &self.axes[i])
    }

    pub fn ensemble_axis(&self) -> Option<&GridAxis1D> {
        self.role_axis(AxisRole::Ensemble).map(GridAxis::as_1d)
    }

    pub fn run_time_axis(&self) -> Option<&GridAxis1DTime> {
        self.role_axis(AxisRole::RunTime).and_then(GridAxis::as_time)
    }

    pub fn time_axis(&self) -> Option<&GridAxis1DTime> {
        self.role_axis(AxisRole::Time).and_then(GridAxis::as_time)
    }

    pub fn time_offset_axis(&self) -> Option<&GridAxis1D> {
        self.role_axis(AxisRole::TimeOffset).map(GridAxis::as_1d)
    }

    pub fn vertical_axis(&self) -> Option<&GridAxis1D> {
        self.role_axis(AxisRole::Vertical).map(GridAxis::as_1d)
    }

    pub fn x_horiz_axis(&self) -> Option<&GridAxis1D> {
        Some(self.horiz.x_axis())
    }

    pub fn y_horiz_axis(&self) -> Option<&GridAxis1D> {
        Some(self.horiz.y_axis())
    }

    pub fn horiz_coord_system(&self) -> Option<&GridHorizCoordinateSystem> {
        Some(&self.horiz)
    }

    pub fn vertical_transform(&self) -> Option<&Arc<dyn VerticalTransform>> {
        self.vertical_transform.as_ref()
    }

    /// Axes that define a dimension of the data, in canonical role order.
    fn shape_axes(&self) -> impl Iterator<Item = (AxisRole, &GridAxis)> + '_ {
        self.roles.iter().filter_map(|(&role, &i)| {
            let axis = &self.axes[i];
            match axis.dependence_type() {
                DependenceType::Scalar | DependenceType::Dependent => None,
                _ => Some((role, axis)),
            }
        })
    }

    /// Sizes in the order RunTime, Ensemble, Time, TimeOffset, Z, Y, X.
    ///
    /// Scalar and dependent axes are left out, so this can differ from the
    /// shape of the data array actually stored.
    pub fn nominal_shape(&self) -> Vec<usize> {
        self.shape_axes().map(|(_, axis)| axis.ncoords()).collect()
    }

    /// Function summary such as `GRID(T,Z,Y,X)`.
    pub fn show_fn_summary(&self) -> String {
        let codes: Vec<&str> = self.shape_axes().map(|(role, _)| role.code()).collect();
        format!("GRID({})", codes.join(","))
    }

    /// Description of the system; with `show_coords` each axis is printed in full.
    pub fn show(&self, show_coords: bool) -> String {
        let mut out = format!("{} {}", self.name, self.show_fn_summary());
        for axis in &self.axes {
            out.push_str("\n  ");
            if show_coords {
                out.push_str(&axis.to_string().replace('\n', "\n  "));
            } else {
                out.push_str(&axis.as_1d().summary());
            }
        }
        if let Some(vt) = &self.vertical_transform {
            out.push_str(&format!(
                "\n  vertical transform: {} ({})",
                vt.name(),
                vt.transform_type()
            ));
        }
        out
    }

    /// A new coordinate system restricted by `params`.
    ///
    /// Each axis is subset by its role, dependent axes follow the axis they
    /// depend on, and the vertical transform is restricted to the chosen
    /// time, vertical and horizontal indices.
    pub fn subset(&self, params: &GridSubset) -> GridResult<GridCoordinateSystem> {
        let mut chosen: HashMap<&str, IndexRange> = HashMap::new();
        let mut role_ranges: HashMap<AxisRole, IndexRange> = HashMap::new();
        let mut axes: Vec<Option<GridAxis>> = vec![None; self.axes.len()];

        for (i, axis) in self.axes.iter().enumerate() {
            let range = match (axis.dependence_type(), axis.role()) {
                (DependenceType::Dependent | DependenceType::Scalar | DependenceType::TwoD, _) => {
                    continue
                }
                (_, Some(AxisRole::X)) => params.horiz_ranges().map(|h| h.x.clone()),
                (_, Some(AxisRole::Y)) => params.horiz_ranges().map(|h| h.y.clone()),
                _ => axis.subset_range(params)?,
            };
            axes[i] = Some(match &range {
                Some(range) => axis.subset_by_index_range(range)?,
                None => axis.clone(),
            });
            if let Some(range) = range {
                if let Some(role) = axis.role() {
                    role_ranges.insert(role, range.clone());
                }
                chosen.insert(axis.name(), range);
            }
        }

        for (i, axis) in self.axes.iter().enumerate() {
            if axes[i].is_some() {
                continue;
            }
            let followed = match axis.dependence_type() {
                DependenceType::Dependent => axis
                    .depends_on()
                    .iter()
                    .find_map(|name| chosen.get(name.as_str())),
                _ => None,
            };
            axes[i] = Some(match followed {
                Some(range) => axis.subset_by_index_range(range)?,
                None => axis.clone(),
            });
        }

        let vertical_transform = match &self.vertical_transform {
            Some(vt) => Some(self.subset_transform(vt, &role_ranges)?),
            None => None,
        };

        tracing::debug!(name = %self.name, params = %params, "subset coordinate system");
        let mut builder = GridCoordinateSystem::builder().set_name(self.name.clone());
        for axis in axes.into_iter().flatten() {
            builder = builder.add_axis(axis);
        }
        if let Some(vt) = vertical_transform {
            builder = builder.set_vertical_transform(vt);
        }
        builder.build()
    }

    fn subset_transform(
        &self,
        vt: &Arc<dyn VerticalTransform>,
        ranges: &HashMap<AxisRole, IndexRange>,
    ) -> GridResult<Arc<dyn VerticalTransform>> {
        let t = ranges
            .get(&AxisRole::Time)
            .or_else(|| ranges.get(&AxisRole::TimeOffset))
            .cloned();
        let z = ranges.get(&AxisRole::Vertical).cloned();
        let y = ranges.get(&AxisRole::Y).cloned();
        let x = ranges.get(&AxisRole::X).cloned();
        if t.is_none() && z.is_none() && y.is_none() && x.is_none() {
            return Ok(Arc::clone(vt));
        }
        Arc::clone(vt).subset(t, z, y, x)
    }
}

impl fmt::Display for GridCoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.show(false))
    }
}

/// Assembles a [`GridCoordinateSystem`]. `build` checks the axes fit together.
#[derive(Debug, Default)]
pub struct GridCoordinateSystemBuilder {
    name: Option<String>,
    axes: Vec<GridAxis>,
    vertical_transform: Option<Arc<dyn VerticalTransform>>,
}

impl GridCoordinateSystemBuilder {
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn add_axis(mut self, axis: impl Into<GridAxis>) -> Self {
        self.axes.push(axis.into());
        self
    }

    pub fn set_axes(mut self, axes: Vec<GridAxis>) -> Self {
        self.axes = axes;
        self
    }

    pub fn set_vertical_transform(mut self, transform: Arc<dyn VerticalTransform>) -> Self {
        self.vertical_transform = Some(transform);
        self
    }

    pub fn build(self) -> GridResult<GridCoordinateSystem> {
        let mut names = HashSet::new();
        let mut roles = BTreeMap::new();
        for (i, axis) in self.axes.iter().enumerate() {
            if !names.insert(axis.name()) {
                return Err(GridError::invalid_argument(format!(
                    "duplicate axis name '{}'",
                    axis.name()
                )));
            }
            let Some(role) = axis.role() else { continue };
            if let Some(prev) = roles.insert(role, i) {
                return Err(GridError::invalid_argument(format!(
                    "axes '{}' and '{}' both have the {:?} role",
                    self.axes[prev].name(),
                    axis.name(),
                    role
                )));
            }
            if matches!(role, AxisRole::Time | AxisRole::RunTime) && axis.as_time().is_none() {
                return Err(GridError::invalid_argument(format!(
                    "{:?} axis '{}' has no calendar date unit",
                    role,
                    axis.name()
                )));
            }
        }

        for axis in &self.axes {
            if let Some(missing) = axis.depends_on().iter().find(|d| !names.contains(d.as_str())) {
                return Err(GridError::invalid_argument(format!(
                    "axis '{}' depends on unknown axis '{}'",
                    axis.name(),
                    missing
                )));
            }
        }

        let role_axis = |role: AxisRole| -> GridResult<GridAxis1D> {
            roles
                .get(&role)
                .map(|&i| self.axes[i].as_1d().clone())
                .ok_or_else(|| GridError::invalid_argument(format!("no {:?} axis", role)))
        };
        let horiz = GridHorizCoordinateSystem::new(role_axis(AxisRole::X)?, role_axis(AxisRole::Y)?)?;

        if let Some(vt) = &self.vertical_transform {
            let [nz, ny, nx] = vt.shape();
            let nz_axis = roles.get(&AxisRole::Vertical).map(|&i| self.axes[i].ncoords());
            if horiz.shape() != [ny, nx] || nz_axis.map_or(false, |n| n != nz) {
                tracing::warn!(
                    transform = vt.name(),
                    transform_shape = ?vt.shape(),
                    horiz_shape = ?horiz.shape(),
                    vertical = ?nz_axis,
                    "vertical transform shape does not match the coordinate axes"
                );
            }
        }

        let name = self.name.unwrap_or_else(|| {
            roles
                .values()
                .map(|&i| self.axes[i].name())
                .collect::<Vec<_>>()
                .join(" ")
        });

        Ok(GridCoordinateSystem {
            name,
            axes: self.axes,
            roles,
            horiz,
            vertical_transform: self.vertical_transform,
        })
    }
}
