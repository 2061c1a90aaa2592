//! Registry and builder for constructing vertical transforms.
//!
//! The `TransformRegistry` maps the `transform_type` or CF `standard_name` of
//! a vertical coordinate to a constructor. All transforms in this crate are
//! registered by default; applications can register more.
//!
//! # Example
//!
//! ```rust,ignore
//! use vertical_transform::{TransformRegistry, VerticalTransformBuilder};
//!
//! let registry = TransformRegistry::default();
//! let transform = VerticalTransformBuilder::new()
//!     .set_name("s_rho")
//!     .set_attributes(coord_attributes)
//!     .build(dataset, &registry)?;
//!
//! let heights = transform.coordinate_array(0)?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use grid_common::attributes::names;
use grid_common::{Attributes, GridError, GridResult};

use crate::config::VerticalTransformConfig;
use crate::dataset::Dataset;
use crate::formula_terms::FormulaTerms;
use crate::transform::{VerticalTransform, VerticalTransformType};
use crate::transforms::{
    AtmosSigma, Existing3DField, HybridHeight, HybridSigmaPressure, OceanS, OceanSG1, OceanSG2,
    OceanSigma,
};

/// Everything a constructor needs to build a transform.
pub struct TransformContext<'a> {
    /// Name of the resulting transform.
    pub name: &'a str,
    /// Dataset the formula terms are read from.
    pub dataset: Arc<dyn Dataset>,
    /// Attributes of the vertical coordinate (or coordinate transform variable).
    pub attributes: &'a Attributes,
    /// Parsed `formula_terms` attribute; empty if absent.
    pub formula_terms: FormulaTerms,
    pub config: &'a VerticalTransformConfig,
}

impl<'a> TransformContext<'a> {
    pub fn new(
        name: &'a str,
        dataset: Arc<dyn Dataset>,
        attributes: &'a Attributes,
        config: &'a VerticalTransformConfig,
    ) -> GridResult<Self> {
        let formula_terms = match attributes.text(names::FORMULA_TERMS) {
            Some(text) => FormulaTerms::parse(text)?,
            None => FormulaTerms::new(),
        };
        Ok(Self {
            name,
            dataset,
            attributes,
            formula_terms,
            config,
        })
    }

    /// Registry key: the `transform_type` attribute if present, else `standard_name`.
    pub fn transform_key(&self) -> Option<&'a str> {
        self.attributes
            .find_text_ignore_case(names::TRANSFORM_TYPE)
            .or_else(|| self.attributes.text(names::STANDARD_NAME))
    }
}

impl fmt::Debug for TransformContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformContext")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("formula_terms", &self.formula_terms)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Constructs a transform from its context.
pub type TransformConstructor =
    fn(&TransformContext<'_>) -> GridResult<Arc<dyn VerticalTransform>>;

/// Maps transform names to constructors. Names are matched ignoring case.
#[derive(Clone)]
pub struct TransformRegistry {
    constructors: HashMap<String, TransformConstructor>,
}

impl Default for TransformRegistry {
    /// A registry holding every transform in this crate, under both its CF
    /// standard name and its type name.
    fn default() -> Self {
        let mut registry = Self::empty();
        for kind in VerticalTransformType::ALL {
            let ctor = builtin(kind);
            registry.register(kind.standard_name(), ctor);
            registry.register(kind.type_name(), ctor);
        }
        registry
    }
}

fn builtin(kind: VerticalTransformType) -> TransformConstructor {
    match kind {
        VerticalTransformType::AtmosSigma => |ctx| Ok(Arc::new(AtmosSigma::from_context(ctx)?)),
        VerticalTransformType::HybridSigmaPressure => {
            |ctx| Ok(Arc::new(HybridSigmaPressure::from_context(ctx)?))
        }
        VerticalTransformType::HybridHeight => |ctx| Ok(Arc::new(HybridHeight::from_context(ctx)?)),
        VerticalTransformType::OceanSigma => |ctx| Ok(Arc::new(OceanSigma::from_context(ctx)?)),
        VerticalTransformType::OceanS => |ctx| Ok(Arc::new(OceanS::from_context(ctx)?)),
        VerticalTransformType::OceanSG1 => |ctx| Ok(Arc::new(OceanSG1::from_context(ctx)?)),
        VerticalTransformType::OceanSG2 => |ctx| Ok(Arc::new(OceanSG2::from_context(ctx)?)),
        VerticalTransformType::Existing3DField => {
            |ctx| Ok(Arc::new(Existing3DField::from_context(ctx)?))
        }
    }
}

impl TransformRegistry {
    /// A registry with no constructors.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register a constructor, replacing any previous one under `name`.
    pub fn register(&mut self, name: &str, ctor: TransformConstructor) {
        self.constructors.insert(name.trim().to_lowercase(), ctor);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(&name.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Construct the transform named by the context's attributes.
    pub fn make(&self, ctx: &TransformContext<'_>) -> GridResult<Arc<dyn VerticalTransform>> {
        let key = ctx.transform_key().ok_or_else(|| {
            GridError::UnknownTransform(format!(
                "{}: no {} or {} attribute",
                ctx.name,
                names::TRANSFORM_TYPE,
                names::STANDARD_NAME
            ))
        })?;

        match self.constructors.get(&key.trim().to_lowercase()) {
            Some(ctor) => {
                tracing::debug!(name = ctx.name, key, "dispatching vertical transform");
                ctor(ctx)
            }
            None => {
                tracing::warn!(name = ctx.name, key, "no vertical transform registered");
                Err(GridError::UnknownTransform(key.to_string()))
            }
        }
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("TransformRegistry")
            .field("names", &names)
            .finish()
    }
}

/// Builds one vertical transform, either from coordinate attributes or by
/// handing back a transform that was already constructed.
///
/// `build` consumes the builder, so a builder cannot produce two transforms.
#[derive(Debug, Default)]
pub struct VerticalTransformBuilder {
    name: Option<String>,
    attributes: Attributes,
    prebuilt: Option<Arc<dyn VerticalTransform>>,
    config: VerticalTransformConfig,
}

impl VerticalTransformBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attributes of the vertical coordinate: `standard_name` or
    /// `transform_type`, `formula_terms`, and for existing fields
    /// `existingDataField`.
    pub fn set_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Use an existing transform; `build` returns it unchanged.
    pub fn set_prebuilt(mut self, transform: Arc<dyn VerticalTransform>) -> Self {
        self.name = Some(transform.name().to_string());
        self.prebuilt = Some(transform);
        self
    }

    pub fn set_config(mut self, config: VerticalTransformConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn build(
        self,
        dataset: Arc<dyn Dataset>,
        registry: &TransformRegistry,
    ) -> GridResult<Arc<dyn VerticalTransform>> {
        if let Some(prebuilt) = self.prebuilt {
            return Ok(prebuilt);
        }
        self.config.validate().map_err(GridError::InvalidArgument)?;

        let name = self.name.as_deref().unwrap_or("vertical");
        let ctx = TransformContext::new(name, dataset, &self.attributes, &self.config)?;
        registry.make(&ctx)
    }
}
