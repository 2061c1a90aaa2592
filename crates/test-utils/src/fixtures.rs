//! Common test fixtures for coordinate and vertical transform tests.
//!
//! This module provides pre-defined test data that represents common
//! scenarios in gridded model output.

/// Ocean S-coordinate parameters.
pub mod ocean_s {
    /// Surface stretching parameter (`theta_s`).
    pub const THETA_S: f64 = 2.0;

    /// Bottom control parameter (`theta_b`).
    pub const THETA_B: f64 = 0.5;

    /// Critical depth (`hc`) in meters.
    pub const DEPTH_C: f64 = 10.0;

    /// Bottom, mid-depth and surface levels.
    pub const S_LEVELS: [f64; 3] = [-1.0, -0.5, 0.0];

    /// Typical ROMS attribute text.
    pub const FORMULA_TERMS: &str = "s: s_rho eta: zeta depth: h a: theta_s b: theta_b depth_c: hc";
}

/// Hybrid sigma-pressure coefficients (5 levels, top to bottom).
pub mod hybrid {
    /// `a(k)`, dimensionless, multiplied by `P0`.
    pub const HYAM: [f64; 5] = [0.00365, 0.0757, 0.2, 0.15, 0.0];

    /// `b(k)`, dimensionless.
    pub const HYBM: [f64; 5] = [0.0, 0.0, 0.1, 0.5, 0.992];

    /// Reference pressure in Pa.
    pub const P0_PA: f64 = 100_000.0;

    /// Reference pressure in hPa.
    pub const P0_HPA: f64 = 1000.0;

    pub const FORMULA_TERMS: &str = "a: hyam b: hybm p0: P0 ps: PS";

    pub const FORMULA_TERMS_AP: &str = "ap: hyai b: hybi ps: PS";
}

/// Axis coordinate values.
pub mod axis {
    /// Irregularly spaced point coordinates.
    pub const IRREGULAR_POINTS: [f64; 4] = [1.0, 2.0, 4.0, 8.0];

    /// Edges of contiguous intervals (five intervals).
    pub const CONTIGUOUS_EDGES: [f64; 6] = [0.0, 1.0, 3.0, 6.0, 10.0, 15.0];

    /// Bounds of discontiguous intervals, as `[lo0, hi0, lo1, hi1, ...]`.
    pub const DISCONTIGUOUS_BOUNDS: [f64; 8] = [0.0, 1.0, 2.0, 4.0, 4.0, 5.0, 10.0, 12.0];

    /// Pressure levels in hPa, descending.
    pub const PRESSURE_LEVELS_HPA: [f64; 6] = [1000.0, 925.0, 850.0, 700.0, 500.0, 250.0];
}

/// Common time values for testing.
pub mod time {
    /// A fixed reference time for tests (2024-01-15T12:00:00Z)
    pub const REFERENCE_TIME: &str = "2024-01-15T12:00:00Z";

    /// Time units anchored at the reference time.
    pub const HOURS_SINCE_REFERENCE: &str = "hours since 2024-01-15T12:00:00Z";

    /// Common forecast hours
    pub const FORECAST_HOURS: [f64; 8] = [0.0, 1.0, 3.0, 6.0, 12.0, 24.0, 48.0, 120.0];
}
