//! Equidistant sample axes and their spectral wavenumbers.
//!
//! Every transformed axis must be strictly equidistant and have an even
//! number of samples (required by the one-sided real transform in
//! [`crate::transform`]). An axis is validated once at construction and is
//! immutable thereafter.

use ndarray::Array1;

use crate::error::WaveError;

/// Relative tolerance for the equidistant-spacing check.
const SPACING_RTOL: f64 = 1e-8;

/// A validated, strictly equidistant sequence of sample positions.
#[derive(Debug, Clone)]
pub struct SampleAxis {
    positions: Vec<f64>,
    spacing: f64,
}

impl SampleAxis {
    /// Build an axis from raw sample positions.
    ///
    /// Fails if there are fewer than two samples, the count is odd, any
    /// position is non-finite, or the spacing is not uniform to within a
    /// relative tolerance of 1e-8.
    pub fn from_positions(positions: &[f64]) -> Result<Self, WaveError> {
        if positions.len() < 2 {
            return Err(WaveError::InvalidGrid(format!(
                "axis needs at least 2 samples, got {}",
                positions.len()
            )));
        }
        if positions.len() % 2 != 0 {
            return Err(WaveError::InvalidGrid(format!(
                "sample count must be even for the one-sided transform, got {}",
                positions.len()
            )));
        }
        if positions.iter().any(|p| !p.is_finite()) {
            return Err(WaveError::InvalidGrid(
                "sample positions must be finite".into(),
            ));
        }

        let spacing = positions[1] - positions[0];
        if spacing <= 0.0 {
            return Err(WaveError::InvalidGrid(
                "sample positions must be strictly increasing".into(),
            ));
        }
        let tol = SPACING_RTOL * spacing.abs().max(1.0);
        for pair in positions.windows(2) {
            let d = pair[1] - pair[0];
            if (d - spacing).abs() > tol {
                return Err(WaveError::InvalidGrid(format!(
                    "samples must be spaced equidistantly (found steps {} and {})",
                    spacing, d
                )));
            }
        }

        Ok(Self {
            positions: positions.to_vec(),
            spacing,
        })
    }

    /// Build an axis of `n` samples starting at `start` with step `spacing`.
    pub fn from_step(start: f64, spacing: f64, n: usize) -> Result<Self, WaveError> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(WaveError::InvalidGrid(format!(
                "spacing must be finite and positive, got {}",
                spacing
            )));
        }
        let positions: Vec<f64> = (0..n).map(|i| start + spacing * i as f64).collect();
        Self::from_positions(&positions)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if the axis holds no samples (never the case for a constructed axis).
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Uniform sample spacing.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Sample positions.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Angular wavenumbers of the one-sided (real-input) transform:
    /// $k_j = 2\pi j / (n \Delta)$ for $j = 0..n/2$, length `n/2 + 1`.
    pub fn one_sided_wavenumbers(&self) -> Array1<f64> {
        let n = self.len();
        let step = 2.0 * std::f64::consts::PI / (n as f64 * self.spacing);
        Array1::from_iter((0..=n / 2).map(|j| step * j as f64))
    }

    /// Angular wavenumbers of the two-sided transform, in transform order:
    /// $[0, 1, .., n/2 - 1, -n/2, .., -1] \cdot 2\pi/(n\Delta)$, length `n`.
    pub fn two_sided_wavenumbers(&self) -> Array1<f64> {
        let n = self.len() as i64;
        let step = 2.0 * std::f64::consts::PI / (n as f64 * self.spacing);
        Array1::from_iter((0..n).map(|j| {
            let j = if j < (n + 1) / 2 { j } else { j - n };
            step * j as f64
        }))
    }

    /// Angular frequencies for a time axis, two-sided and sign-flipped.
    ///
    /// Linear theory assumes plane waves $\exp[i(kx - \omega t)]$ while the
    /// transform pair uses $\exp[i(kx + \omega t)]$; the flip reconciles the
    /// two conventions.
    pub fn angular_frequencies(&self) -> Array1<f64> {
        -self.two_sided_wavenumbers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_even_equidistant_axis_is_accepted() {
        let x: Vec<f64> = (0..8).map(|i| 0.5 * i as f64).collect();
        let axis = SampleAxis::from_positions(&x).unwrap();
        assert_eq!(axis.len(), 8);
        assert_abs_diff_eq!(axis.spacing(), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_odd_sample_count_is_rejected() {
        let x: Vec<f64> = (0..7).map(|i| i as f64).collect();
        assert!(matches!(
            SampleAxis::from_positions(&x),
            Err(WaveError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_irregular_spacing_is_rejected() {
        let x = [0.0, 1.0, 2.0, 3.5, 4.0, 5.0];
        assert!(matches!(
            SampleAxis::from_positions(&x),
            Err(WaveError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_decreasing_axis_is_rejected() {
        let x = [3.0, 2.0, 1.0, 0.0];
        assert!(SampleAxis::from_positions(&x).is_err());
    }

    #[test]
    fn test_one_sided_wavenumbers_match_rfftfreq() {
        // n = 8, d = 1: rfftfreq gives [0, 1/8, 2/8, 3/8, 4/8]
        let axis = SampleAxis::from_step(0.0, 1.0, 8).unwrap();
        let k = axis.one_sided_wavenumbers();
        assert_eq!(k.len(), 5);
        let tau = 2.0 * std::f64::consts::PI;
        for (j, &kj) in k.iter().enumerate() {
            assert_abs_diff_eq!(kj, tau * j as f64 / 8.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_two_sided_wavenumbers_match_fftfreq() {
        // n = 6, d = 2: fftfreq order [0, 1, 2, -3, -2, -1] / (6*2)
        let axis = SampleAxis::from_step(0.0, 2.0, 6).unwrap();
        let k = axis.two_sided_wavenumbers();
        let tau = 2.0 * std::f64::consts::PI;
        let expected = [0.0, 1.0, 2.0, -3.0, -2.0, -1.0];
        for (kj, ej) in k.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*kj, tau * ej / 12.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_angular_frequencies_are_sign_flipped() {
        let axis = SampleAxis::from_step(0.0, 0.25, 4).unwrap();
        let omega = axis.angular_frequencies();
        let k = axis.two_sided_wavenumbers();
        for (w, kj) in omega.iter().zip(k.iter()) {
            assert_abs_diff_eq!(*w, -kj, epsilon = 1e-14);
        }
    }
}
