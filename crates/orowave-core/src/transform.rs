//! Forward and inverse spectral transforms.
//!
//! Convention (forward normalisation, matching `numpy.fft.rfft(.., norm='forward')`):
//! - Forward: a real sequence of even length $N$ maps to $N/2+1$ complex
//!   coefficients $(1/N)\sum_n x_n e^{-2\pi i k n / N}$.
//! - Inverse: the one-sided spectrum is extended by conjugate symmetry and
//!   summed with **no** additional scaling.
//!
//! 2-D grids transform the last axis one-sided (real input) and the first
//! axis two-sided (complex), with the $1/(N_0 N_1)$ normalisation applied on
//! the forward pass.
//!
//! Built on `rustfft`/`realfft`; the backend choice does not affect the
//! normalisation contract.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use realfft::RealFftPlanner;
use rustfft::FftPlanner;

use crate::error::WaveError;

/// Forward one-sided transform of a real signal.
///
/// Returns `n/2 + 1` coefficients normalised by `1/n`.
pub fn forward_1d(signal: &[f64]) -> Result<Array1<Complex64>, WaveError> {
    let n = signal.len();
    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(n);

    let mut input = signal.to_vec();
    let mut spectrum = r2c.make_output_vec();
    r2c.process(&mut input, &mut spectrum)
        .map_err(|e| WaveError::Transform(e.to_string()))?;

    let norm = 1.0 / n as f64;
    Ok(Array1::from_iter(spectrum.into_iter().map(|c| c * norm)))
}

/// Inverse one-sided transform of a `(mode, height)` spectral field.
///
/// Each height column is inverted independently along the mode axis,
/// producing an `(n, heights)` real array. The imaginary parts of the DC and
/// Nyquist bins are discarded: a one-sided spectrum of a real signal has
/// none, and the defunct-mode patching upstream zeroes both bins anyway.
pub fn inverse_1d(field: &Array2<Complex64>, n: usize) -> Result<Array2<f64>, WaveError> {
    let (n_modes, n_heights) = field.dim();
    if n_modes != n / 2 + 1 {
        return Err(WaveError::Transform(format!(
            "one-sided spectrum of a length-{} signal must have {} modes, got {}",
            n,
            n / 2 + 1,
            n_modes
        )));
    }

    let mut planner = RealFftPlanner::<f64>::new();
    let c2r = planner.plan_fft_inverse(n);

    let mut out = Array2::<f64>::zeros((n, n_heights));
    for j in 0..n_heights {
        let mut spectrum: Vec<Complex64> = (0..n_modes).map(|i| field[[i, j]]).collect();
        spectrum[0] = Complex64::from(spectrum[0].re);
        spectrum[n_modes - 1] = Complex64::from(spectrum[n_modes - 1].re);

        let mut signal = c2r.make_output_vec();
        c2r.process(&mut spectrum, &mut signal)
            .map_err(|e| WaveError::Transform(e.to_string()))?;

        for (i, v) in signal.into_iter().enumerate() {
            out[[i, j]] = v;
        }
    }
    Ok(out)
}

/// Forward 2-D transform of a real `(n0, n1)` field.
///
/// One-sided along the last axis, two-sided along the first; the result has
/// shape `(n0, n1/2 + 1)` and is normalised by `1/(n0 * n1)`.
pub fn forward_2d(field: &Array2<f64>) -> Result<Array2<Complex64>, WaveError> {
    let (n0, n1) = field.dim();
    let n1c = n1 / 2 + 1;

    // One-sided transform of each row (last axis).
    let mut real_planner = RealFftPlanner::<f64>::new();
    let r2c = real_planner.plan_fft_forward(n1);
    let mut half = Array2::<Complex64>::zeros((n0, n1c));
    for i in 0..n0 {
        let mut input: Vec<f64> = (0..n1).map(|j| field[[i, j]]).collect();
        let mut spectrum = r2c.make_output_vec();
        r2c.process(&mut input, &mut spectrum)
            .map_err(|e| WaveError::Transform(e.to_string()))?;
        for (j, c) in spectrum.into_iter().enumerate() {
            half[[i, j]] = c;
        }
    }

    // Two-sided transform of each column (first axis).
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n0);
    for j in 0..n1c {
        let mut column: Vec<Complex64> = (0..n0).map(|i| half[[i, j]]).collect();
        fft.process(&mut column);
        for (i, c) in column.into_iter().enumerate() {
            half[[i, j]] = c;
        }
    }

    let norm = 1.0 / (n0 * n1) as f64;
    Ok(half.mapv(|c| c * norm))
}

/// Inverse 2-D transform of an `(n0, n1/2 + 1)` spectral field back to a real
/// `(n0, n1)` field. No scaling is applied (normalisation happened forward).
pub fn inverse_2d(field: &Array2<Complex64>, n1: usize) -> Result<Array2<f64>, WaveError> {
    let (n0, n1c) = field.dim();
    if n1c != n1 / 2 + 1 {
        return Err(WaveError::Transform(format!(
            "one-sided axis of a width-{} field must have {} modes, got {}",
            n1,
            n1 / 2 + 1,
            n1c
        )));
    }

    // Two-sided inverse along the first axis.
    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(n0);
    let mut half = field.clone();
    for j in 0..n1c {
        let mut column: Vec<Complex64> = (0..n0).map(|i| half[[i, j]]).collect();
        ifft.process(&mut column);
        for (i, c) in column.into_iter().enumerate() {
            half[[i, j]] = c;
        }
    }

    // One-sided inverse along the last axis.
    let mut real_planner = RealFftPlanner::<f64>::new();
    let c2r = real_planner.plan_fft_inverse(n1);
    let mut out = Array2::<f64>::zeros((n0, n1));
    for i in 0..n0 {
        let mut spectrum: Vec<Complex64> = (0..n1c).map(|j| half[[i, j]]).collect();
        spectrum[0] = Complex64::from(spectrum[0].re);
        spectrum[n1c - 1] = Complex64::from(spectrum[n1c - 1].re);

        let mut row = c2r.make_output_vec();
        c2r.process(&mut spectrum, &mut row)
            .map_err(|e| WaveError::Transform(e.to_string()))?;
        for (j, v) in row.into_iter().enumerate() {
            out[[i, j]] = v;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_forward_normalisation_of_constant_signal() {
        // A constant signal has all its content in the mean mode, equal to
        // the constant itself under forward normalisation.
        let signal = vec![3.0; 16];
        let spectrum = forward_1d(&signal).unwrap();
        assert_abs_diff_eq!(spectrum[0].re, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(spectrum[0].im, 0.0, epsilon = 1e-12);
        for c in spectrum.iter().skip(1) {
            assert_abs_diff_eq!(c.norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_forward_of_unit_cosine_splits_amplitude() {
        // cos(2π n / N) puts 1/2 in the first one-sided bin.
        let n = 32;
        let tau = 2.0 * std::f64::consts::PI;
        let signal: Vec<f64> = (0..n).map(|i| (tau * i as f64 / n as f64).cos()).collect();
        let spectrum = forward_1d(&signal).unwrap();
        assert_abs_diff_eq!(spectrum[1].re, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(spectrum[1].im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip_1d() {
        let n = 24;
        let signal: Vec<f64> = (0..n)
            .map(|i| (0.3 * i as f64).sin() + 0.1 * (i as f64) - 2.0)
            .collect();
        let spectrum = forward_1d(&signal).unwrap();
        let field = Array2::from_shape_fn((spectrum.len(), 1), |(i, _)| spectrum[i]);
        let recovered = inverse_1d(&field, n).unwrap();
        for (i, &v) in signal.iter().enumerate() {
            assert_abs_diff_eq!(recovered[[i, 0]], v, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_round_trip_2d() {
        let (n0, n1) = (6, 8);
        let field =
            Array2::from_shape_fn((n0, n1), |(i, j)| ((i * n1 + j) as f64 * 0.37).sin() + 1.5);
        let spectrum = forward_2d(&field).unwrap();
        let recovered = inverse_2d(&spectrum, n1).unwrap();
        for i in 0..n0 {
            for j in 0..n1 {
                assert_abs_diff_eq!(recovered[[i, j]], field[[i, j]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_inverse_rejects_wrong_mode_count() {
        let field = Array2::<Complex64>::zeros((4, 1));
        assert!(matches!(
            inverse_1d(&field, 8),
            Err(WaveError::Transform(_))
        ));
    }
}
