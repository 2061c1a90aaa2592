//! Attribute key/value metadata attached to variables, axes and transforms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Well-known attribute names.
pub mod names {
    pub const UNITS: &str = "units";
    pub const LONG_NAME: &str = "long_name";
    pub const STANDARD_NAME: &str = "standard_name";
    pub const FORMULA_TERMS: &str = "formula_terms";
    pub const POSITIVE: &str = "positive";
    pub const FILL_VALUE: &str = "_FillValue";
    pub const MISSING_VALUE: &str = "missing_value";
    pub const TRANSFORM_TYPE: &str = "transform_type";
    pub const EXISTING_DATA_FIELD: &str = "existingDataField";
}

/// The value of a single attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Numbers(Vec<f64>),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Numbers(_) => None,
        }
    }

    /// First numeric value. Text values are parsed if they hold a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Numbers(v) => v.first().copied(),
            AttributeValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            AttributeValue::Numbers(v) => Some(v),
            AttributeValue::Text(_) => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Numbers(vec![v])
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(v: Vec<f64>) -> Self {
        AttributeValue::Numbers(v)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => write!(f, "\"{}\"", s),
            AttributeValue::Numbers(v) => {
                let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

/// An ordered attribute container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(flatten)]
    entries: BTreeMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries.get(name)
    }

    /// Look up a text attribute, ignoring case in the name.
    pub fn find_text_ignore_case(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.as_str())
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttributeValue::as_str)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(AttributeValue::as_f64)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
