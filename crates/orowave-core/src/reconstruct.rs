//! Final-stage field reconstruction.
//!
//! Every solver produces a complex spectral field (modes × heights, or a
//! mode grid per height). Before the inverse transform this stage:
//!
//! 1. zeroes the defunct modes — the mean and Nyquist components have no
//!    physically meaningful vertical wavenumber and are forced to exactly
//!    zero regardless of their computed value;
//! 2. asserts the field is finite — masked degeneracies upstream must have
//!    been fully patched, so a residual NaN/∞ is an internal construction
//!    error, not a warning;
//! 3. drives the inverse transform back to physical space.

use ndarray::{Array2, Array3};
use num_complex::Complex64;

use crate::error::WaveError;
use crate::transform;

/// Zero the defunct modes of a one-sided `(mode, height)` field: the mean
/// (row 0) and the Nyquist wavenumber (last row).
pub fn zero_defunct_1d(field: &mut Array2<Complex64>) {
    let n_modes = field.nrows();
    for j in 0..field.ncols() {
        field[[0, j]] = Complex64::from(0.0);
        field[[n_modes - 1, j]] = Complex64::from(0.0);
    }
}

/// Zero the defunct modes of a 2-D `(two-sided, one-sided)` mode grid: the
/// mean, the Nyquist slice of the two-sided axis (row `n0/2`) and the
/// Nyquist slice of the one-sided axis (last column), each independently.
pub fn zero_defunct_2d(field: &mut Array2<Complex64>) {
    let (n0, n1c) = field.dim();
    field[[0, 0]] = Complex64::from(0.0);
    for j in 0..n1c {
        field[[n0 / 2, j]] = Complex64::from(0.0);
    }
    for i in 0..n0 {
        field[[i, n1c - 1]] = Complex64::from(0.0);
    }
}

/// Verify that every entry of a spectral field is finite.
fn ensure_finite<'a, I>(values: I, context: &str) -> Result<(), WaveError>
where
    I: IntoIterator<Item = &'a Complex64>,
{
    for (i, c) in values.into_iter().enumerate() {
        if !(c.re.is_finite() && c.im.is_finite()) {
            return Err(WaveError::NonFiniteField(format!(
                "{} (first bad entry at flat index {})",
                context, i
            )));
        }
    }
    Ok(())
}

/// Patch defunct modes, check integrity, and invert a `(mode, height)` field
/// to an `(x, height)` real array.
pub fn to_physical_1d(
    mut field: Array2<Complex64>,
    nx: usize,
    context: &str,
) -> Result<Array2<f64>, WaveError> {
    zero_defunct_1d(&mut field);
    ensure_finite(field.iter(), context)?;
    transform::inverse_1d(&field, nx)
}

/// Patch defunct modes, check integrity, and invert one 2-D mode grid per
/// height to a `(height, n0, n1)` real array.
pub fn to_physical_2d(
    mut fields: Vec<Array2<Complex64>>,
    n1: usize,
    context: &str,
) -> Result<Array3<f64>, WaveError> {
    let n_heights = fields.len();
    let n0 = fields.first().map_or(0, |f| f.nrows());

    let mut out = Array3::<f64>::zeros((n_heights, n0, n1));
    for (iz, field) in fields.iter_mut().enumerate() {
        zero_defunct_2d(field);
        ensure_finite(field.iter(), context)?;
        let physical = transform::inverse_2d(field, n1)?;
        out.index_axis_mut(ndarray::Axis(0), iz).assign(&physical);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defunct_rows_are_zeroed_1d() {
        let mut field = Array2::from_elem((5, 2), Complex64::new(1.0, -2.0));
        zero_defunct_1d(&mut field);
        for j in 0..2 {
            assert_eq!(field[[0, j]], Complex64::from(0.0));
            assert_eq!(field[[4, j]], Complex64::from(0.0));
            assert_eq!(field[[2, j]], Complex64::new(1.0, -2.0));
        }
    }

    #[test]
    fn test_defunct_slices_are_zeroed_2d() {
        let mut field = Array2::from_elem((6, 5), Complex64::new(1.0, 1.0));
        zero_defunct_2d(&mut field);
        assert_eq!(field[[0, 0]], Complex64::from(0.0));
        for j in 0..5 {
            assert_eq!(field[[3, j]], Complex64::from(0.0));
        }
        for i in 0..6 {
            assert_eq!(field[[i, 4]], Complex64::from(0.0));
        }
        assert_eq!(field[[1, 1]], Complex64::new(1.0, 1.0));
    }

    #[test]
    fn test_residual_nan_is_a_fatal_error() {
        let mut field = Array2::from_elem((5, 1), Complex64::from(1.0));
        field[[2, 0]] = Complex64::new(f64::NAN, 0.0);
        let err = to_physical_1d(field, 8, "test field").unwrap_err();
        assert!(matches!(err, WaveError::NonFiniteField(_)));
    }

    #[test]
    fn test_nan_in_defunct_mode_is_patched_not_fatal() {
        // The masked singular value at the mean mode is overwritten before
        // the integrity check ever sees it.
        let mut field = Array2::from_elem((5, 1), Complex64::from(0.0));
        field[[0, 0]] = Complex64::new(f64::INFINITY, f64::NAN);
        assert!(to_physical_1d(field, 8, "test field").is_ok());
    }
}
