//! Two-dimensional steady model on an x–y grid.
//!
//! A horizontal wind vector $(U, V)$ blows over two-dimensional terrain
//! $h(x, y)$; the intrinsic frequency of a stationary mode is
//! $\Omega = -Uk - Vl$ and the horizontal wavenumber magnitude is
//! $\kappa = \sqrt{k^2 + l^2}$. The half-plane radiation condition closes
//! the problem.
//!
//! Modes with $\Omega$ within a relative tolerance of zero (wavefronts
//! parallel to the wind) are patched to $m = 0$ before any division; they
//! carry no vertical structure. An optional hydrostatic approximation
//! replaces the full dispersion relation by $m = -\kappa N / \Omega$ for
//! flows whose horizontal scale dwarfs the vertical one.
//!
//! Storage layout: arrays are `(y, x)` with the one-sided transform along
//! the x axis and the two-sided transform along y.

use ndarray::{Array2, Array3};
use num_complex::Complex64;

use crate::dispersion;
use crate::error::WaveError;
use crate::grid::SampleAxis;
use crate::reconstruct;
use crate::transform;
use crate::types::FlowVariable;

/// Relative tolerance below which an intrinsic frequency counts as zero.
const ZERO_OMEGA_RTOL: f64 = 1e-6;

/// Steady half-plane model over two-dimensional terrain.
#[derive(Debug, Clone)]
pub struct PlanformWaveModel {
    x_axis: SampleAxis,
    y_axis: SampleAxis,
    /// Intrinsic frequency per `(y, x)` mode.
    omega_i: Array2<f64>,
    /// Complex vertical wavenumbers.
    m: Array2<Complex64>,
    /// Spectral terrain amplitudes.
    hc: Array2<Complex64>,
}

impl PlanformWaveModel {
    /// Construct a model from a `(y, x)` terrain field.
    ///
    /// # Arguments
    /// * `x` - Equidistant streamwise positions (even count).
    /// * `y` - Equidistant spanwise positions (even count).
    /// * `terrain` - Surface elevation, shape `(y.len(), x.len())`.
    /// * `wind` - Background wind vector `(U, V)`; its magnitude must be
    ///   nonzero.
    /// * `buoyancy` - Brunt–Väisälä frequency (non-negative).
    /// * `hydrostatic` - Use the hydrostatic dispersion relation.
    pub fn new(
        x: &[f64],
        y: &[f64],
        terrain: &Array2<f64>,
        wind: (f64, f64),
        buoyancy: f64,
        hydrostatic: bool,
    ) -> Result<Self, WaveError> {
        let x_axis = SampleAxis::from_positions(x)?;
        let y_axis = SampleAxis::from_positions(y)?;
        if terrain.dim() != (y_axis.len(), x_axis.len()) {
            return Err(WaveError::InvalidGrid(format!(
                "terrain shape {:?} does not match the (y, x) grid ({}, {})",
                terrain.dim(),
                y_axis.len(),
                x_axis.len()
            )));
        }
        if terrain.iter().any(|h| !h.is_finite()) {
            return Err(WaveError::InvalidParameter(
                "terrain elevations must be finite".into(),
            ));
        }
        let (u, v) = wind;
        if u * u + v * v == 0.0 {
            return Err(WaveError::InvalidParameter(
                "background wind vector must have nonzero magnitude".into(),
            ));
        }
        if !(buoyancy.is_finite() && buoyancy >= 0.0) {
            return Err(WaveError::InvalidParameter(format!(
                "buoyancy frequency must be non-negative, got {}",
                buoyancy
            )));
        }

        let k = x_axis.one_sided_wavenumbers();
        let l = y_axis.two_sided_wavenumbers();
        let (ny, nkc) = (l.len(), k.len());

        let mut kappa = Array2::<f64>::zeros((ny, nkc));
        let mut omega_i = Array2::<f64>::zeros((ny, nkc));
        for iy in 0..ny {
            for jk in 0..nkc {
                kappa[[iy, jk]] = (k[jk] * k[jk] + l[iy] * l[iy]).sqrt();
                omega_i[[iy, jk]] = -u * k[jk] - v * l[iy];
            }
        }

        let m = if hydrostatic {
            dispersion::hydrostatic_wavenumbers(&kappa, &omega_i, buoyancy, ZERO_OMEGA_RTOL)
        } else {
            // Same branch selection as in 1-D, with the near-zero intrinsic
            // frequencies patched by the relative tolerance rather than an
            // exact comparison.
            let scale = omega_i.iter().fold(0.0_f64, |acc, &o| acc.max(o.abs()));
            let cutoff = ZERO_OMEGA_RTOL * scale;
            let mut m = Array2::<Complex64>::zeros((ny, nkc));
            for (idx, entry) in m.indexed_iter_mut() {
                let om = omega_i[idx];
                *entry = if om.abs() <= cutoff {
                    Complex64::from(0.0)
                } else {
                    dispersion::vertical_wavenumber(kappa[idx], om, buoyancy)
                };
            }
            m
        };

        let hc = transform::forward_2d(terrain)?;

        Ok(Self {
            x_axis,
            y_axis,
            omega_i,
            m,
            hc,
        })
    }

    /// Streamwise sample positions.
    pub fn x_positions(&self) -> &[f64] {
        self.x_axis.positions()
    }

    /// Spanwise sample positions.
    pub fn y_positions(&self) -> &[f64] {
        self.y_axis.positions()
    }

    /// Solve for a flow variable at the given heights.
    ///
    /// Returns a `(height, y, x)` array. Only displacement and vertical
    /// velocity are available on planform grids; the horizontal velocity
    /// components and pressure are unsupported.
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
                    model: "planform",
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

        reconstruct::to_physical_2d(fields, self.x_axis.len(), "planform field")
    }

    /// Solve for a flow variable at a single height, returning `(y, x)`.
    pub fn solve_at(&self, variable: FlowVariable, height: f64) -> Result<Array2<f64>, WaveError> {
        let field = self.solve(variable, &[height])?;
        Ok(field.index_axis(ndarray::Axis(0), 0).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ridge_terrain(ny: usize, nx: usize, length: f64) -> (Vec<f64>, Vec<f64>, Array2<f64>) {
        let k0 = 2.0 * std::f64::consts::PI / length;
        let x: Vec<f64> = (0..nx).map(|i| length / nx as f64 * i as f64).collect();
        let y: Vec<f64> = (0..ny).map(|i| length / ny as f64 * i as f64).collect();
        let h = Array2::from_shape_fn((ny, nx), |(_, j)| 80.0 * (k0 * x[j]).sin());
        (x, y, h)
    }

    #[test]
    fn test_displacement_at_ground_recovers_terrain() {
        let (x, y, h) = ridge_terrain(4, 8, 60_000.0);
        let model = PlanformWaveModel::new(&x, &y, &h, (10.0, 0.0), 0.01, false).unwrap();
        let eta = model.solve_at(FlowVariable::Displacement, 0.0).unwrap();
        for (e, v) in eta.iter().zip(h.iter()) {
            assert_abs_diff_eq!(*e, *v, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_zero_wind_vector_is_rejected() {
        let (x, y, h) = ridge_terrain(4, 8, 60_000.0);
        assert!(matches!(
            PlanformWaveModel::new(&x, &y, &h, (0.0, 0.0), 0.01, false),
            Err(WaveError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_spanwise_only_wind_is_accepted() {
        let (x, y, h) = ridge_terrain(4, 8, 60_000.0);
        assert!(PlanformWaveModel::new(&x, &y, &h, (0.0, 8.0), 0.01, false).is_ok());
    }

    #[test]
    fn test_hydrostatic_wavenumbers_are_finite() {
        let (x, y, h) = ridge_terrain(4, 8, 60_000.0);
        let model = PlanformWaveModel::new(&x, &y, &h, (10.0, 3.0), 0.01, true).unwrap();
        assert!(model
            .m
            .iter()
            .all(|c| c.re.is_finite() && c.im.is_finite()));
        let field = model
            .solve(FlowVariable::Displacement, &[0.0, 500.0])
            .unwrap();
        assert!(field.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_unsupported_variables_error() {
        let (x, y, h) = ridge_terrain(4, 8, 60_000.0);
        let model = PlanformWaveModel::new(&x, &y, &h, (10.0, 0.0), 0.01, false).unwrap();
        for var in [
            FlowVariable::HorizontalVelocity,
            FlowVariable::SpanwiseVelocity,
            FlowVariable::Pressure,
        ] {
            assert!(matches!(
                model.solve(var, &[0.0]),
                Err(WaveError::Unsupported { .. })
            ));
        }
    }
}
