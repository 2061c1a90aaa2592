//! Grid axes and coordinate systems for gridded datasets.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  GridCoordinateSystem                     │
//! │  RunTime  Ensemble  Time  TimeOffset  Z   Y   X           │
//! └──────┬─────────────────────┬───────────────┬──────────────┘
//!        │                     │               │
//!        ▼                     ▼               ▼
//! ┌───────────────┐   ┌─────────────────┐  ┌──────────────────────┐
//! │ GridAxis1D    │   │ GridAxis1DTime  │  │ VerticalTransform    │
//! │ edges, midpts │   │ calendar dates  │  │ (vertical-transform) │
//! │ subsetting    │   └─────────────────┘  └──────────────────────┘
//! └───────────────┘
//! ```
//!
//! Axes and coordinate systems are built once and never change; every
//! subset operation returns a new value.
//!
//! # Example
//!
//! ```
//! use grid_coords::{AxisType, GridAxis1D, GridCoordinateSystem, GridSubset, Spacing};
//!
//! let x = GridAxis1D::builder()
//!     .set_name("x")
//!     .set_axis_type(AxisType::GeoX)
//!     .set_spacing(Spacing::RegularPoint)
//!     .set_regular(4, 0.0, 3.0, 1.0)
//!     .build()
//!     .unwrap();
//! let y = GridAxis1D::builder()
//!     .set_name("y")
//!     .set_axis_type(AxisType::GeoY)
//!     .set_spacing(Spacing::RegularPoint)
//!     .set_regular(3, 0.0, 2.0, 1.0)
//!     .build()
//!     .unwrap();
//! let z = GridAxis1D::builder()
//!     .set_name("isobaric")
//!     .set_axis_type(AxisType::Pressure)
//!     .set_spacing(Spacing::IrregularPoint)
//!     .set_values(vec![1000.0, 850.0, 500.0])
//!     .build()
//!     .unwrap();
//!
//! let cs = GridCoordinateSystem::builder()
//!     .add_axis(z)
//!     .add_axis(y)
//!     .add_axis(x)
//!     .build()
//!     .unwrap();
//! assert_eq!(cs.show_fn_summary(), "GRID(Z,Y,X)");
//! assert_eq!(cs.nominal_shape(), vec![3, 3, 4]);
//!
//! let level = cs.subset(&GridSubset::new().set_vert_point(840.0)).unwrap();
//! assert_eq!(level.vertical_axis().unwrap().midpoint(0).unwrap(), 850.0);
//! ```

pub mod axis;
pub mod axis1d;
pub mod coord_sys;
pub mod helper;
pub mod horiz;
pub mod subset;
pub mod time_axis;

pub use axis::{AxisRole, AxisType, DependenceType, GridAxis, Spacing};
pub use axis1d::{Coord, CoordIter, GridAxis1D, GridAxis1DBuilder};
pub use coord_sys::{GridCoordinateSystem, GridCoordinateSystemBuilder};
pub use helper::GridAxis1DHelper;
pub use horiz::GridHorizCoordinateSystem;
pub use subset::{GridSubset, HorizRanges};
pub use time_axis::GridAxis1DTime;

pub use grid_common::{CoordInterval, GridError, GridResult, IndexRange, MinMax};
