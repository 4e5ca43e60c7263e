//! Transient one-layer model on an x–t grid.
//!
//! The terrain is allowed to evolve in time (an impulsively started or
//! growing obstacle); the response is resolved into plane waves
//! $\exp[i(kx - \omega t)]$ with intrinsic frequency $\Omega = \omega - Uk$
//! per mode. The half-plane radiation condition closes the problem exactly
//! as in the steady case, with $\Omega$ taking the role of $-Uk$.
//!
//! Storage layout: arrays are `(time, x)` with the one-sided transform along
//! the x axis and the two-sided (sign-flipped, see
//! [`crate::grid::SampleAxis::angular_frequencies`]) transform along time.

use ndarray::{Array2, Array3};
use num_complex::Complex64;

use crate::dispersion;
use crate::error::WaveError;
use crate::grid::SampleAxis;
use crate::reconstruct;
use crate::transform;
use crate::types::FlowVariable;

/// Transient half-plane model over a time-dependent terrain.
#[derive(Debug, Clone)]
pub struct TransientWaveModel {
    x_axis: SampleAxis,
    t_axis: SampleAxis,
    /// Intrinsic frequency per `(time, x)` mode.
    omega_i: Array2<f64>,
    /// Complex vertical wavenumbers.
    m: Array2<Complex64>,
    /// Spectral terrain amplitudes.
    hc: Array2<Complex64>,
}

impl TransientWaveModel {
    /// Construct a model from a `(time, x)` terrain history.
    ///
    /// # Arguments
    /// * `x` - Equidistant spatial positions (even count).
    /// * `t` - Equidistant time samples (even count).
    /// * `terrain` - Surface elevation, shape `(t.len(), x.len())`.
    /// * `wind` - Background wind speed (nonzero).
    /// * `buoyancy` - Brunt–Väisälä frequency (non-negative).
    pub fn new(
        x: &[f64],
        t: &[f64],
        terrain: &Array2<f64>,
        wind: f64,
        buoyancy: f64,
    ) -> Result<Self, WaveError> {
        let x_axis = SampleAxis::from_positions(x)?;
        let t_axis = SampleAxis::from_positions(t)?;
        if terrain.dim() != (t_axis.len(), x_axis.len()) {
            return Err(WaveError::InvalidGrid(format!(
                "terrain shape {:?} does not match the (time, x) grid ({}, {})",
                terrain.dim(),
                t_axis.len(),
                x_axis.len()
            )));
        }
        if terrain.iter().any(|h| !h.is_finite()) {
            return Err(WaveError::InvalidParameter(
                "terrain elevations must be finite".into(),
            ));
        }
        if wind == 0.0 {
            return Err(WaveError::InvalidParameter(
                "background wind speed must be nonzero".into(),
            ));
        }
        if !(buoyancy.is_finite() && buoyancy >= 0.0) {
            return Err(WaveError::InvalidParameter(format!(
                "buoyancy frequency must be non-negative, got {}",
                buoyancy
            )));
        }

        let k = x_axis.one_sided_wavenumbers();
        let omega = t_axis.angular_frequencies();
        let (nt, nkc) = (omega.len(), k.len());

        let mut kappa = Array2::<f64>::zeros((nt, nkc));
        let mut omega_i = Array2::<f64>::zeros((nt, nkc));
        for it in 0..nt {
            for jk in 0..nkc {
                kappa[[it, jk]] = k[jk];
                omega_i[[it, jk]] = omega[it] - wind * k[jk];
            }
        }

        let m = dispersion::grid_wavenumbers(&kappa, &omega_i, buoyancy);
        let hc = transform::forward_2d(terrain)?;

        Ok(Self {
            x_axis,
            t_axis,
            omega_i,
            m,
            hc,
        })
    }

    /// Spatial sample positions.
    pub fn x_positions(&self) -> &[f64] {
        self.x_axis.positions()
    }

    /// Time samples.
    pub fn t_positions(&self) -> &[f64] {
        self.t_axis.positions()
    }

    /// Solve for a flow variable at the given heights.
    ///
    /// Returns a `(height, time, x)` array. Only displacement and vertical
    /// velocity are available on transient grids.
    pub fn solve(&self, variable: FlowVariable, heights: &[f64]) -> Result<Array3<f64>, WaveError> {
        if heights.is_empty() {
            return Err(WaveError::InvalidParameter(
                "at least one target height is required".into(),
            ));
        }
        for &z in heights {
            if !z.is_finite() || z < 0.0 {
                return Err(WaveError::HeightOutOfRange {
                    height: z,
                    domain: "z >= 0".into(),
                });
            }
        }

        let i = Complex64::i();
        let amplitude = match variable {
            FlowVariable::Displacement => self.hc.clone(),
            // w = D(eta)/Dt in the moving frame.
            FlowVariable::VerticalVelocity => {
                let mut a = self.hc.clone();
                for (idx, v) in a.indexed_iter_mut() {
                    *v = -i * self.omega_i[idx] * *v;
                }
                a
            }
            _ => {
                return Err(WaveError::Unsupported {
                    variable,
                    model: "transient",
                })
            }
        };

        let fields: Vec<Array2<Complex64>> = heights
            .iter()
            .map(|&z| {
                let mut field = amplitude.clone();
                for (idx, v) in field.indexed_iter_mut() {
                    *v *= (i * self.m[idx] * z).exp();
                }
                field
            })
            .collect();

        reconstruct::to_physical_2d(fields, self.x_axis.len(), "transient field")
    }

    /// Solve for a flow variable at a single height, returning `(time, x)`.
    pub fn solve_at(&self, variable: FlowVariable, height: f64) -> Result<Array2<f64>, WaveError> {
        let field = self.solve(variable, &[height])?;
        Ok(field.index_axis(ndarray::Axis(0), 0).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Terrain constant in time, sinusoidal in x.
    fn steady_sine(nt: usize, nx: usize, length: f64) -> (Vec<f64>, Vec<f64>, Array2<f64>) {
        let k0 = 2.0 * std::f64::consts::PI / length;
        let x: Vec<f64> = (0..nx).map(|i| length / nx as f64 * i as f64).collect();
        let t: Vec<f64> = (0..nt).map(|i| 10.0 * i as f64).collect();
        let h = Array2::from_shape_fn((nt, nx), |(_, j)| 50.0 * (k0 * x[j]).sin());
        (x, t, h)
    }

    #[test]
    fn test_displacement_at_ground_recovers_terrain() {
        let (x, t, h) = steady_sine(4, 8, 50_000.0);
        let model = TransientWaveModel::new(&x, &t, &h, 10.0, 0.01).unwrap();
        let eta = model.solve_at(FlowVariable::Displacement, 0.0).unwrap();
        for (e, v) in eta.iter().zip(h.iter()) {
            assert_abs_diff_eq!(*e, *v, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_terrain_shape_mismatch_is_rejected() {
        let (x, t, _) = steady_sine(4, 8, 50_000.0);
        let wrong = Array2::<f64>::zeros((8, 4));
        assert!(matches!(
            TransientWaveModel::new(&x, &t, &wrong, 10.0, 0.01),
            Err(WaveError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_horizontal_velocity_and_pressure_are_unsupported() {
        let (x, t, h) = steady_sine(4, 8, 50_000.0);
        let model = TransientWaveModel::new(&x, &t, &h, 10.0, 0.01).unwrap();
        for var in [FlowVariable::HorizontalVelocity, FlowVariable::Pressure] {
            assert!(matches!(
                model.solve(var, &[100.0]),
                Err(WaveError::Unsupported { .. })
            ));
        }
    }

    #[test]
    fn test_field_is_finite_aloft() {
        let (x, t, h) = steady_sine(4, 8, 500.0);
        let model = TransientWaveModel::new(&x, &t, &h, 10.0, 0.01).unwrap();
        let w = model
            .solve(FlowVariable::VerticalVelocity, &[0.0, 100.0, 1000.0])
            .unwrap();
        assert!(w.iter().all(|v| v.is_finite()));
    }
}
