//! Configuration for vertical transform evaluation.

use grid_common::{SimpleUnit, UnitKind};
use serde::{Deserialize, Serialize};

/// Configuration shared by all vertical transforms built through the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalTransformConfig {
    /// Reject a non-zero time index on transforms that are not time dependent.
    /// When false the index is ignored.
    pub strict_time_index: bool,

    /// Convert formula terms whose units differ from the transform's
    /// reference unit when a conversion factor is known.
    pub convert_term_units: bool,

    /// Unit that pressure transforms report their output in. `None` keeps the
    /// unit of the surface pressure term.
    pub output_pressure_unit: Option<String>,
}

impl Default for VerticalTransformConfig {
    fn default() -> Self {
        Self {
            strict_time_index: false,
            convert_term_units: true,
            output_pressure_unit: None,
        }
    }
}

impl VerticalTransformConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("VT_STRICT_TIME_INDEX") {
            config.strict_time_index = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("VT_CONVERT_TERM_UNITS") {
            config.convert_term_units = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("VT_PRESSURE_UNIT") {
            if !val.trim().is_empty() {
                config.output_pressure_unit = Some(val.trim().to_string());
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(unit) = &self.output_pressure_unit {
            match SimpleUnit::parse(unit) {
                Some(u) if u.kind() == UnitKind::Pressure => {}
                _ => {
                    return Err(format!(
                        "output_pressure_unit '{}' is not a pressure unit",
                        unit
                    ))
                }
            }
        }
        Ok(())
    }
}

fn parse_bool(val: &str) -> bool {
    val.eq_ignore_ascii_case("true") || val == "1"
}
