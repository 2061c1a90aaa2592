//! Unit strings for vertical coordinates.
//!
//! Only the small set of units that vertical coordinates are expressed in is
//! understood here: pressure, length and dimensionless level indices. Unit
//! incompatibility is reported as a `bool`, never as an error, since callers
//! may still want to display a coordinate whose units do not match.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical quantity a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Pressure,
    Length,
    Dimensionless,
}

/// A parsed unit: its kind and the factor that converts it to the SI unit
/// of that kind (Pa, m, 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleUnit {
    symbol: String,
    kind: UnitKind,
    factor: f64,
}

// (names, kind, factor to SI)
const UNIT_TABLE: &[(&[&str], UnitKind, f64)] = &[
    (&["pa", "pascal", "pascals"], UnitKind::Pressure, 1.0),
    (&["hpa", "hectopascal", "hectopascals"], UnitKind::Pressure, 100.0),
    (&["mbar", "millibar", "millibars", "mb"], UnitKind::Pressure, 100.0),
    (&["kpa", "kilopascal", "kilopascals"], UnitKind::Pressure, 1000.0),
    (&["bar", "bars"], UnitKind::Pressure, 100_000.0),
    (&["atm", "atmosphere"], UnitKind::Pressure, 101_325.0),
    (&["m", "meter", "meters", "metre", "metres"], UnitKind::Length, 1.0),
    (&["km", "kilometer", "kilometers", "kilometre", "kilometres"], UnitKind::Length, 1000.0),
    (&["cm", "centimeter", "centimeters"], UnitKind::Length, 0.01),
    (&["mm", "millimeter", "millimeters"], UnitKind::Length, 0.001),
    (&["1", "", "level", "layer", "sigma_level", "dimensionless"], UnitKind::Dimensionless, 1.0),
];

impl SimpleUnit {
    /// Parse a unit string. Returns `None` for units outside the table.
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        UNIT_TABLE
            .iter()
            .find(|(names, _, _)| names.contains(&key.as_str()))
            .map(|(_, kind, factor)| Self {
                symbol: s.trim().to_string(),
                kind: *kind,
                factor: *factor,
            })
    }

    /// Reference pressure unit (Pa).
    pub fn pressure() -> Self {
        Self {
            symbol: "Pa".to_string(),
            kind: UnitKind::Pressure,
            factor: 1.0,
        }
    }

    /// Reference length unit (m).
    pub fn meter() -> Self {
        Self {
            symbol: "m".to_string(),
            kind: UnitKind::Length,
            factor: 1.0,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Check if a unit string measures the same quantity as this unit.
    pub fn is_compatible(&self, other: &str) -> bool {
        SimpleUnit::parse(other).map_or(false, |u| u.kind == self.kind)
    }

    /// Multiplier converting a value in this unit into `to`.
    pub fn factor_to(&self, to: &SimpleUnit) -> Option<f64> {
        if self.kind != to.kind {
            return None;
        }
        Some(self.factor / to.factor)
    }
}

impl fmt::Display for SimpleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Check if two unit strings measure the same quantity.
pub fn is_compatible(a: &str, b: &str) -> bool {
    match (SimpleUnit::parse(a), SimpleUnit::parse(b)) {
        (Some(ua), Some(ub)) => ua.kind == ub.kind,
        _ => false,
    }
}

/// Multiplier converting values in `from` units into `to` units, if both are
/// known and compatible.
pub fn conversion_factor(from: &str, to: &str) -> Option<f64> {
    let from = SimpleUnit::parse(from)?;
    let to = SimpleUnit::parse(to)?;
    from.factor_to(&to)
}
