//! One-layer steady-state wave models.
//!
//! A uniform layer of wind $U$ and buoyancy frequency $N$ flows over terrain
//! $h(x)$. Per spectral mode the vertical structure solves
//! $\partial^2\eta/\partial z^2 + m^2 \eta = 0$, a combination of
//! $e^{imz}$ exponentials closed by the boundary condition:
//!
//! - **Half-plane**: only the outgoing/decaying component survives, so the
//!   field is $A\,e^{imz}$ with $A$ fixed by $\eta(0) = h$.
//! - **Rigid lid** at $H$: two counter-propagating components satisfy
//!   $\eta(0) = h$ and $\eta(H) = 0$, giving coefficients
//!   $\pm h_c / (1 - e^{2imH})$.
//!
//! Velocity and pressure fields follow from the displacement by spectral
//! operators: $w = U\,\partial\eta/\partial x$, continuity for $u$, and the
//! streamwise momentum balance for $p$.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::dispersion;
use crate::error::WaveError;
use crate::grid::SampleAxis;
use crate::reconstruct;
use crate::solver::BoundaryCondition;
use crate::transform;
use crate::types::FlowVariable;

/// Steady one-layer model over a 1-D terrain profile.
///
/// Immutable after construction; `solve` may be called concurrently.
#[derive(Debug, Clone)]
pub struct LinearWaveModel {
    axis: SampleAxis,
    wind: f64,
    boundary: BoundaryCondition,
    /// One-sided horizontal wavenumbers.
    k: Array1<f64>,
    /// Complex vertical wavenumbers, one per mode.
    m: Array1<Complex64>,
    /// Spectral terrain amplitudes.
    hc: Array1<Complex64>,
}

impl LinearWaveModel {
    /// Construct a model from a terrain profile and flow parameters.
    ///
    /// # Arguments
    /// * `x` - Equidistant sample positions (even count).
    /// * `terrain` - Surface elevation at each sample, real and finite.
    /// * `wind` - Background wind speed (nonzero).
    /// * `buoyancy` - Brunt–Väisälä frequency (non-negative).
    /// * `boundary` - Top boundary configuration.
    pub fn new(
        x: &[f64],
        terrain: &[f64],
        wind: f64,
        buoyancy: f64,
        boundary: BoundaryCondition,
    ) -> Result<Self, WaveError> {
        let axis = SampleAxis::from_positions(x)?;
        if terrain.len() != axis.len() {
            return Err(WaveError::InvalidGrid(format!(
                "terrain has {} samples but the grid has {}",
                terrain.len(),
                axis.len()
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
        if let BoundaryCondition::RigidLid { height } = boundary {
            if !(height.is_finite() && height > 0.0) {
                return Err(WaveError::InvalidParameter(format!(
                    "lid height must be positive, got {}",
                    height
                )));
            }
        }

        let k = axis.one_sided_wavenumbers();
        let m = dispersion::steady_wavenumbers(&k, wind, buoyancy);
        let hc = transform::forward_1d(terrain)?;

        Ok(Self {
            axis,
            wind,
            boundary,
            k,
            m,
            hc,
        })
    }

    /// The boundary configuration this model closes with.
    pub fn boundary(&self) -> BoundaryCondition {
        self.boundary
    }

    /// Sample positions of the underlying grid.
    pub fn positions(&self) -> &[f64] {
        self.axis.positions()
    }

    /// Solve for a flow variable at the given heights.
    ///
    /// Returns an `(x, height)` array of the physical-space field.
    pub fn solve(&self, variable: FlowVariable, heights: &[f64]) -> Result<Array2<f64>, WaveError> {
        self.boundary.validate_heights(heights)?;

        let field = match self.boundary {
            BoundaryCondition::HalfPlane => self.half_plane_field(variable, heights)?,
            BoundaryCondition::RigidLid { height } => {
                self.channel_field(variable, heights, height)?
            }
        };

        reconstruct::to_physical_1d(field, self.axis.len(), "steady one-layer field")
    }

    /// Solve for a flow variable at a single height.
    pub fn solve_at(&self, variable: FlowVariable, height: f64) -> Result<Array1<f64>, WaveError> {
        let field = self.solve(variable, &[height])?;
        Ok(field.column(0).to_owned())
    }

    /// Half-plane closed form: $A\,e^{imz}$ with the spectral operator for
    /// the requested variable folded into $A$.
    fn half_plane_field(
        &self,
        variable: FlowVariable,
        heights: &[f64],
    ) -> Result<Array2<Complex64>, WaveError> {
        let i = Complex64::i();
        let u = self.wind;

        let n_modes = self.k.len();
        let mut amplitude = Array1::<Complex64>::zeros(n_modes);
        for (j, a) in amplitude.iter_mut().enumerate() {
            let kj = self.k[j];
            let mj = self.m[j];
            let hcj = self.hc[j];
            *a = match variable {
                FlowVariable::Displacement => hcj,
                // w = U * d(eta)/dx
                FlowVariable::VerticalVelocity => i * u * kj * hcj,
                // du/dx + dw/dz = 0
                FlowVariable::HorizontalVelocity => -i * u * mj * hcj,
                // U * du/dx = -dp/dx
                FlowVariable::Pressure => i * u * u * mj * hcj,
                FlowVariable::SpanwiseVelocity => {
                    return Err(WaveError::Unsupported {
                        variable,
                        model: "one-layer steady",
                    })
                }
            };
        }

        let mut field = Array2::<Complex64>::zeros((n_modes, heights.len()));
        for (jz, &z) in heights.iter().enumerate() {
            for jm in 0..n_modes {
                field[[jm, jz]] = amplitude[jm] * (i * self.m[jm] * z).exp();
            }
        }
        Ok(field)
    }

    /// Channel closed form: two counter-propagating components with the
    /// $m = 0$ singularity masked.
    fn channel_field(
        &self,
        variable: FlowVariable,
        heights: &[f64],
        lid: f64,
    ) -> Result<Array2<Complex64>, WaveError> {
        let i = Complex64::i();
        let u = self.wind;
        let n_modes = self.k.len();

        // hc / (1 - exp(2imH)), with the zero-wavenumber mode masked: m = 0
        // collapses the denominator and the mode is zeroed as defunct later.
        let mut coeff = Array1::<Complex64>::zeros(n_modes);
        for (j, c) in coeff.iter_mut().enumerate() {
            let mj = self.m[j];
            *c = if mj == Complex64::from(0.0) {
                Complex64::from(0.0)
            } else {
                self.hc[j] / (Complex64::from(1.0) - (i * 2.0 * mj * lid).exp())
            };
        }

        let mut field = Array2::<Complex64>::zeros((n_modes, heights.len()));
        for (jz, &z) in heights.iter().enumerate() {
            for jm in 0..n_modes {
                let mj = self.m[jm];
                let up = (i * mj * z).exp();
                let down = (i * mj * (2.0 * lid - z)).exp();
                field[[jm, jz]] = match variable {
                    // eta = c (e^{imz} - e^{im(2H-z)}) vanishes at z = H.
                    FlowVariable::Displacement => coeff[jm] * (up - down),
                    FlowVariable::VerticalVelocity => {
                        i * u * self.k[jm] * coeff[jm] * (up - down)
                    }
                    // The reflected component flips sign under d/dz, so u and
                    // p carry the sum of the two exponentials.
                    FlowVariable::HorizontalVelocity => -i * mj * u * coeff[jm] * (up + down),
                    FlowVariable::Pressure => i * mj * u * u * coeff[jm] * (up + down),
                    FlowVariable::SpanwiseVelocity => {
                        return Err(WaveError::Unsupported {
                            variable,
                            model: "one-layer steady",
                        })
                    }
                };
            }
        }
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// One period of a sine hill on 8 points, as in the reference scenario.
    fn sine_terrain(n: usize, length: f64) -> (Vec<f64>, Vec<f64>) {
        let dx = length / n as f64;
        let k0 = 2.0 * std::f64::consts::PI / length;
        let x: Vec<f64> = (0..n).map(|i| dx * i as f64).collect();
        let h: Vec<f64> = x.iter().map(|&xi| 100.0 * (k0 * xi).sin()).collect();
        (x, h)
    }

    #[test]
    fn test_displacement_at_ground_recovers_terrain() {
        let (x, h) = sine_terrain(8, 50_000.0);
        let model =
            LinearWaveModel::new(&x, &h, 10.0, 0.01, BoundaryCondition::HalfPlane).unwrap();
        let eta = model.solve_at(FlowVariable::Displacement, 0.0).unwrap();
        for (ei, hi) in eta.iter().zip(h.iter()) {
            assert_abs_diff_eq!(*ei, *hi, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_scenario_mode_is_propagating() {
        // k0 = 2π/50km ≈ 1.26e-4; |U k0| ≈ 1.26e-3 < N = 0.01.
        let (x, h) = sine_terrain(8, 50_000.0);
        let model =
            LinearWaveModel::new(&x, &h, 10.0, 0.01, BoundaryCondition::HalfPlane).unwrap();
        let m1 = model.m[1];
        assert!(m1.im == 0.0 && m1.re != 0.0, "k0 mode should propagate");
    }

    #[test]
    fn test_zero_wind_is_rejected() {
        let (x, h) = sine_terrain(8, 50_000.0);
        assert!(matches!(
            LinearWaveModel::new(&x, &h, 0.0, 0.01, BoundaryCondition::HalfPlane),
            Err(WaveError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_negative_buoyancy_is_rejected() {
        let (x, h) = sine_terrain(8, 50_000.0);
        assert!(LinearWaveModel::new(&x, &h, 10.0, -0.01, BoundaryCondition::HalfPlane).is_err());
    }

    #[test]
    fn test_mismatched_terrain_length_is_rejected() {
        let (x, _) = sine_terrain(8, 50_000.0);
        let h = vec![0.0; 6];
        assert!(matches!(
            LinearWaveModel::new(&x, &h, 10.0, 0.01, BoundaryCondition::HalfPlane),
            Err(WaveError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_negative_height_is_a_precondition_failure() {
        let (x, h) = sine_terrain(8, 50_000.0);
        let model =
            LinearWaveModel::new(&x, &h, 10.0, 0.01, BoundaryCondition::HalfPlane).unwrap();
        assert!(matches!(
            model.solve(FlowVariable::Displacement, &[-1.0]),
            Err(WaveError::HeightOutOfRange { .. })
        ));
    }

    #[test]
    fn test_channel_height_above_lid_is_rejected() {
        let (x, h) = sine_terrain(8, 50_000.0);
        let model = LinearWaveModel::new(
            &x,
            &h,
            10.0,
            0.01,
            BoundaryCondition::RigidLid { height: 4000.0 },
        )
        .unwrap();
        assert!(model.solve(FlowVariable::Displacement, &[4000.1]).is_err());
    }

    #[test]
    fn test_channel_displacement_vanishes_at_lid() {
        let (x, h) = sine_terrain(16, 50_000.0);
        let lid = 3000.0;
        let model = LinearWaveModel::new(
            &x,
            &h,
            10.0,
            0.01,
            BoundaryCondition::RigidLid { height: lid },
        )
        .unwrap();
        let eta = model.solve_at(FlowVariable::Displacement, lid).unwrap();
        for &v in eta.iter() {
            assert_abs_diff_eq!(v, 0.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_evanescent_half_plane_amplitude_decays_with_height() {
        // Short hill: |U k| > N for every nonzero mode, so the wave field
        // decays monotonically upward.
        let (x, h) = sine_terrain(8, 100.0);
        let model =
            LinearWaveModel::new(&x, &h, 10.0, 0.01, BoundaryCondition::HalfPlane).unwrap();
        let low = model.solve_at(FlowVariable::Displacement, 1.0).unwrap();
        let high = model.solve_at(FlowVariable::Displacement, 50.0).unwrap();
        let amp = |v: &Array1<f64>| v.iter().fold(0.0_f64, |a, &b| a.max(b.abs()));
        assert!(amp(&high) < amp(&low));
        assert!(amp(&low) < 100.0);
    }

    #[test]
    fn test_spanwise_velocity_is_unsupported() {
        let (x, h) = sine_terrain(8, 50_000.0);
        let model =
            LinearWaveModel::new(&x, &h, 10.0, 0.01, BoundaryCondition::HalfPlane).unwrap();
        assert!(matches!(
            model.solve(FlowVariable::SpanwiseVelocity, &[0.0]),
            Err(WaveError::Unsupported { .. })
        ));
    }
}
