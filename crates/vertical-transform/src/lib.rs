//! Vertical coordinate transforms.
//!
//! Model output often stores its vertical coordinate in a compact,
//! model-native form: sigma levels, hybrid coefficients, or stretched ocean
//! S-coordinates. A `formula_terms` attribute names the variables the formula
//! needs. This crate resolves those terms against a [`Dataset`] and evaluates
//! the physical coordinate (pressure or height) per time step.
//!
//! # Architecture
//!
//! ```text
//! coordinate attributes (standard_name, formula_terms)
//!      │
//!      ▼
//! TransformRegistry::make(ctx)
//!      │
//!      ├─► resolve terms against the Dataset (fails eagerly)
//!      │
//!      ├─► read static terms once, precompute level curves
//!      │
//!      └─► Arc<dyn VerticalTransform>
//!               │
//!               ├─► coordinate_array(t)         → Array3 [z, y, x]
//!               ├─► coordinate_array_1d(t, x, y) → Array1 [z]
//!               └─► subset(t, z, y, x)          → VerticalTransformSubset
//! ```
//!
//! # Example
//!
//! ```ignore
//! use vertical_transform::{TransformRegistry, VerticalTransformBuilder};
//!
//! let transform = VerticalTransformBuilder::new()
//!     .set_name("s_rho")
//!     .set_attributes(attributes)
//!     .build(dataset, &TransformRegistry::default())?;
//!
//! for t in 0..transform.num_times().unwrap_or(1) {
//!     let z = transform.coordinate_array(t)?;
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod formula_terms;
pub mod registry;
pub mod subset;
mod terms;
pub mod transform;
pub mod transforms;

// Re-export commonly used types at crate root
pub use config::VerticalTransformConfig;
pub use dataset::{
    Dataset, InMemoryDataset, InMemoryDatasetBuilder, IsMissing, MissingValues, Variable,
};
pub use formula_terms::FormulaTerms;
pub use registry::{
    TransformConstructor, TransformContext, TransformRegistry, VerticalTransformBuilder,
};
pub use subset::VerticalTransformSubset;
pub use transform::{VerticalTransform, VerticalTransformType};
