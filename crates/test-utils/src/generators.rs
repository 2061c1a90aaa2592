//! Test data generators for synthetic vertical levels and horizontal fields.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

use ndarray::{Array2, Array3};

/// Creates a horizontal field with predictable values.
///
/// Each cell value is calculated as: `j * 1000 + i`
///
/// This makes it easy to verify that a subset or a single column was taken
/// from the right place by checking that `field[[j, i]] == j * 1000 + i`.
///
/// # Example
///
/// ```
/// use test_utils::create_index_field;
///
/// let field = create_index_field(5, 10);
/// assert_eq!(field.dim(), (5, 10));
/// assert_eq!(field[[0, 1]], 1.0);
/// assert_eq!(field[[1, 0]], 1000.0);
/// ```
pub fn create_index_field(ny: usize, nx: usize) -> Array2<f64> {
    Array2::from_shape_fn((ny, nx), |(j, i)| (j * 1000 + i) as f64)
}

/// Creates a horizontal field filled with a constant value.
pub fn create_constant_field(ny: usize, nx: usize, value: f64) -> Array2<f64> {
    Array2::from_elem((ny, nx), value)
}

/// Creates a bathymetry field in meters.
///
/// Depth grows linearly from `shallow` at the first column to `deep` at the
/// last column, like a shelf sloping away from a coast.
pub fn create_depth_field(ny: usize, nx: usize, shallow: f64, deep: f64) -> Array2<f64> {
    let span = (nx.max(2) - 1) as f64;
    Array2::from_shape_fn((ny, nx), |(_, i)| shallow + (deep - shallow) * i as f64 / span)
}

/// Creates a time varying free-surface elevation in meters.
///
/// `eta(t, j, i) = amplitude * sin(t + 0.1 * i)`, so every time step differs
/// and the field is never all zeros after the first step.
pub fn create_eta_series(nt: usize, ny: usize, nx: usize, amplitude: f64) -> Array3<f64> {
    Array3::from_shape_fn((nt, ny, nx), |(t, _, i)| {
        amplitude * (t as f64 + 0.1 * i as f64).sin()
    })
}

/// Creates a time varying surface pressure series in Pa.
///
/// Values are around 1000 hPa and differ by 100 Pa per time step, plus a
/// 10 Pa per column gradient.
pub fn create_surface_pressure_series(nt: usize, ny: usize, nx: usize) -> Array3<f64> {
    Array3::from_shape_fn((nt, ny, nx), |(t, _, i)| {
        100_000.0 + 100.0 * t as f64 + 10.0 * i as f64
    })
}

/// Creates `n` ocean S-coordinate levels at layer centers.
///
/// Values are `-1 + (k + 0.5) / n`, ascending from the bottom toward the
/// surface, like the `s_rho` variable of a ROMS history file.
///
/// # Example
///
/// ```
/// use test_utils::create_s_rho_levels;
///
/// let s = create_s_rho_levels(4);
/// assert_eq!(s, vec![-0.875, -0.625, -0.375, -0.125]);
/// ```
pub fn create_s_rho_levels(n: usize) -> Vec<f64> {
    (0..n)
        .map(|k| -1.0 + (k as f64 + 0.5) / n as f64)
        .collect()
}

/// Creates `n` evenly spaced sigma levels from the top (near 0) to the
/// surface (near 1), at layer centers.
pub fn create_sigma_levels(n: usize) -> Vec<f64> {
    (0..n).map(|k| (k as f64 + 0.5) / n as f64).collect()
}

/// Creates a field with NaN values at specified positions.
///
/// Useful for testing missing data handling.
///
/// # Arguments
///
/// * `ny` - Number of rows
/// * `nx` - Number of columns
/// * `value` - Value everywhere else
/// * `nan_positions` - List of `(j, i)` positions that should be NaN
pub fn create_field_with_nans(
    ny: usize,
    nx: usize,
    value: f64,
    nan_positions: &[(usize, usize)],
) -> Array2<f64> {
    let mut field = Array2::from_elem((ny, nx), value);
    for &(j, i) in nan_positions {
        if j < ny && i < nx {
            field[[j, i]] = f64::NAN;
        }
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_depth_field() {
        let depth = create_depth_field(2, 5, 10.0, 50.0);
        assert_eq!(depth[[0, 0]], 10.0);
        assert_eq!(depth[[1, 4]], 50.0);
        assert_eq!(depth[[1, 2]], 30.0);
    }

    #[test]
    fn test_create_eta_series_varies_in_time() {
        let eta = create_eta_series(3, 2, 2, 0.5);
        assert_eq!(eta[[0, 0, 0]], 0.0);
        assert_ne!(eta[[1, 0, 0]], eta[[2, 0, 0]]);
    }

    #[test]
    fn test_create_sigma_levels() {
        let sigma = create_sigma_levels(2);
        assert_eq!(sigma, vec![0.25, 0.75]);
    }

    #[test]
    fn test_create_field_with_nans() {
        let field = create_field_with_nans(3, 3, 1.0, &[(1, 1), (5, 5)]);
        assert!(field[[1, 1]].is_nan());
        assert_eq!(field.iter().filter(|v| v.is_nan()).count(), 1);
    }
}
