//! Vertical-wavenumber branch selection.
//!
//! For a mode with horizontal wavenumber magnitude $\kappa$, intrinsic
//! frequency $\Omega$ and buoyancy frequency $N$, the linear dispersion
//! relation gives the vertical wavenumber
//!
//! $$ m^2 = \kappa^2 \left( \frac{N^2}{\Omega^2} - 1 \right) $$
//!
//! and the solver must pick the physically admissible root:
//!
//! - **Evanescent** ($\Omega^2 > N^2$): $m = +i\,\kappa\sqrt{1 - N^2/\Omega^2}$.
//!   The positive imaginary part makes $e^{imz}$ decay away from the terrain.
//! - **Propagating** ($0 < \Omega^2 \le N^2$): $m = -\mathrm{sign}(\Omega)\,
//!   \kappa\sqrt{N^2/\Omega^2 - 1}$. The vertical group velocity
//!   $w_g = -\Omega m / \kappa^2$ then points away from the terrain, so no
//!   energy arrives from infinity (radiation condition).
//! - **Degenerate** ($\Omega = 0$, which includes $\kappa = 0$): $m = 0$ by
//!   definition. The mode carries no well-defined vertical structure and is
//!   zeroed downstream as defunct; no division is performed and no error is
//!   raised.
//!
//! This is the single sign convention used throughout the crate.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Vertical wavenumber of a single spectral mode.
///
/// Pure function of the horizontal wavenumber (its magnitude is taken
/// internally), the intrinsic frequency and the buoyancy frequency.
pub fn vertical_wavenumber(k: f64, omega_i: f64, buoyancy: f64) -> Complex64 {
    if omega_i == 0.0 {
        return Complex64::from(0.0);
    }
    let kappa = k.abs();
    let ratio = (buoyancy / omega_i).powi(2);
    if ratio < 1.0 {
        // Evanescent: decay away from the forcing surface.
        Complex64::new(0.0, kappa * (1.0 - ratio).sqrt())
    } else {
        // Propagating: upward group velocity fixes the sign.
        Complex64::new(-omega_i.signum() * kappa * (ratio - 1.0).sqrt(), 0.0)
    }
}

/// Vertical wavenumbers for a one-sided steady spectrum.
///
/// For steady flow the wave is stationary in the ground frame, so
/// $\Omega = -U k$ mode by mode.
pub fn steady_wavenumbers(k: &Array1<f64>, wind: f64, buoyancy: f64) -> Array1<Complex64> {
    k.mapv(|kj| vertical_wavenumber(kj, -wind * kj, buoyancy))
}

/// Vertical wavenumbers over a 2-D mode grid with per-mode intrinsic
/// frequency (transient x–t grids and planform x–y grids).
pub fn grid_wavenumbers(
    kappa: &Array2<f64>,
    omega_i: &Array2<f64>,
    buoyancy: f64,
) -> Array2<Complex64> {
    let mut m = Array2::<Complex64>::zeros(kappa.raw_dim());
    for ((idx, &kap), &om) in kappa.indexed_iter().zip(omega_i.iter()) {
        m[idx] = vertical_wavenumber(kap, om, buoyancy);
    }
    m
}

/// Hydrostatic vertical wavenumbers, $m = -\kappa N / \Omega$.
///
/// Valid when the horizontal scale is much larger than the vertical one, so
/// the $\kappa^2$ term in the dispersion relation is negligible. Modes whose
/// intrinsic frequency is within `rel_tol` of zero (relative to the largest
/// $|\Omega|$ on the grid) are patched to $m = 0$ instead of dividing.
pub fn hydrostatic_wavenumbers(
    kappa: &Array2<f64>,
    omega_i: &Array2<f64>,
    buoyancy: f64,
    rel_tol: f64,
) -> Array2<Complex64> {
    let omega_scale = omega_i.iter().fold(0.0_f64, |acc, &o| acc.max(o.abs()));
    let cutoff = rel_tol * omega_scale;

    let mut m = Array2::<Complex64>::zeros(kappa.raw_dim());
    for ((idx, &kap), &om) in kappa.indexed_iter().zip(omega_i.iter()) {
        m[idx] = if om.abs() <= cutoff {
            Complex64::from(0.0)
        } else {
            Complex64::from(-kap.abs() * buoyancy / om)
        };
    }
    m
}
