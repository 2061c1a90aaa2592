//! The decoded-dataset collaborator.
//!
//! Vertical transforms never parse files. They see a [`Dataset`]: named
//! numeric variables with dimensions, units and attributes, already decoded
//! into memory or readable on demand by some format-specific reader.

use std::collections::HashMap;

use grid_common::attributes::names;
use grid_common::{AttributeValue, Attributes, GridError, GridResult};
use ndarray::{ArrayD, Axis};

/// Mix-in for values that can flag missing data.
pub trait IsMissing {
    /// True if there may be missing data.
    fn has_missing(&self) -> bool;

    /// Test if `value` is a missing data value.
    fn is_missing(&self, value: f64) -> bool;
}

/// Fill and missing values of a variable, read once from its attributes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MissingValues {
    fill_value: Option<f64>,
    missing_value: Option<f64>,
}

impl IsMissing for MissingValues {
    fn has_missing(&self) -> bool {
        self.fill_value.is_some() || self.missing_value.is_some()
    }

    fn is_missing(&self, value: f64) -> bool {
        value.is_nan() || self.fill_value == Some(value) || self.missing_value == Some(value)
    }
}

/// Metadata of a named variable: dimensions, shape, units and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    dims: Vec<String>,
    shape: Vec<usize>,
    attributes: Attributes,
}

impl Variable {
    /// Create a variable. `dims` and `shape` must have the same rank.
    pub fn new(name: impl Into<String>, dims: &[&str], shape: &[usize]) -> GridResult<Self> {
        let name = name.into();
        if dims.len() != shape.len() {
            return Err(GridError::invalid_argument(format!(
                "variable '{}' has {} dimension names for a rank {} shape",
                name,
                dims.len(),
                shape.len()
            )));
        }
        Ok(Self {
            name,
            dims: dims.iter().map(|d| d.to_string()).collect(),
            shape: shape.to_vec(),
            attributes: Attributes::new(),
        })
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.attributes.insert(names::UNITS, units.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn units(&self) -> Option<&str> {
        self.attributes.text(names::UNITS)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// The `_FillValue` and `missing_value` attributes, for use in per-element loops.
    pub fn missing_values(&self) -> MissingValues {
        MissingValues {
            fill_value: self.attributes.number(names::FILL_VALUE),
            missing_value: self.attributes.number(names::MISSING_VALUE),
        }
    }
}

impl IsMissing for Variable {
    fn has_missing(&self) -> bool {
        self.missing_values().has_missing()
    }

    fn is_missing(&self, value: f64) -> bool {
        self.missing_values().is_missing(value)
    }
}

/// Source of named variables for vertical transforms.
///
/// Reads may block on I/O; failures should be returned as [`GridError::Read`]
/// so they reach the caller unchanged.
pub trait Dataset: Send + Sync {
    /// Find the metadata of a variable by name.
    fn find_variable(&self, name: &str) -> Option<&Variable>;

    /// Read the full contents of a variable.
    fn read(&self, name: &str) -> GridResult<ArrayD<f64>>;

    /// Read one index of the outermost (time) dimension of a variable.
    fn read_time_slice(&self, name: &str, time_index: usize) -> GridResult<ArrayD<f64>> {
        let data = self.read(name)?;
        time_slice(name, &data, time_index)
    }
}

fn time_slice(name: &str, data: &ArrayD<f64>, time_index: usize) -> GridResult<ArrayD<f64>> {
    if data.ndim() == 0 {
        return Err(GridError::invalid_argument(format!(
            "variable '{}' is a scalar and has no time dimension",
            name
        )));
    }
    let ntimes = data.shape()[0];
    if time_index >= ntimes {
        return Err(GridError::InvalidTimeIndex {
            index: time_index,
            ntimes,
        });
    }
    Ok(data.index_axis(Axis(0), time_index).to_owned())
}

/// A dataset held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataset {
    variables: HashMap<String, (Variable, ArrayD<f64>)>,
}

impl InMemoryDataset {
    pub fn builder() -> InMemoryDatasetBuilder {
        InMemoryDatasetBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }
}

impl Dataset for InMemoryDataset {
    fn find_variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name).map(|(v, _)| v)
    }

    fn read(&self, name: &str) -> GridResult<ArrayD<f64>> {
        self.variables
            .get(name)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| GridError::invalid_argument(format!("no variable named '{}'", name)))
    }

    fn read_time_slice(&self, name: &str, time_index: usize) -> GridResult<ArrayD<f64>> {
        let (_, data) = self
            .variables
            .get(name)
            .ok_or_else(|| GridError::invalid_argument(format!("no variable named '{}'", name)))?;
        time_slice(name, data, time_index)
    }
}

/// Builder for [`InMemoryDataset`].
#[derive(Debug, Default)]
pub struct InMemoryDatasetBuilder {
    variables: HashMap<String, (Variable, ArrayD<f64>)>,
}

impl InMemoryDatasetBuilder {
    /// Add a variable with its data. The data shape must match the variable shape.
    pub fn add_variable(mut self, variable: Variable, data: ArrayD<f64>) -> GridResult<Self> {
        if variable.shape() != data.shape() {
            return Err(GridError::ShapeMismatch {
                name: variable.name().to_string(),
                expected: variable.shape().to_vec(),
                found: data.shape().to_vec(),
            });
        }
        self.variables
            .insert(variable.name().to_string(), (variable, data));
        Ok(self)
    }

    /// Add a variable, deriving its shape from the data.
    pub fn add(
        self,
        name: &str,
        dims: &[&str],
        units: Option<&str>,
        data: ArrayD<f64>,
    ) -> GridResult<Self> {
        let mut variable = Variable::new(name, dims, data.shape())?;
        if let Some(units) = units {
            variable = variable.with_units(units);
        }
        self.add_variable(variable, data)
    }

    pub fn build(self) -> InMemoryDataset {
        InMemoryDataset {
            variables: self.variables,
        }
    }
}
