//! Layered steady-state model with interface matching.
//!
//! The atmosphere is split into $N_l$ layers with piecewise-constant wind and
//! stratification, interfaces at $0 = z_0 < z_1 < \dots < z_{N_l-1}$ and a
//! semi-infinite top layer. Within layer $l$ the displacement of one spectral
//! mode is a pair of locally-phased exponentials
//!
//! $$ \eta_l(z) = A_l\,e^{i m_l (z - z_l)} + B_l\,e^{-i m_l (z - z_{l+1})} $$
//!
//! referenced to the layer's own interfaces, so every exponential evaluated
//! inside the layer has magnitude at most one and thick layers cannot
//! overflow. Enforcing $\eta(0) = h_c$, continuity of $\eta$ and
//! $\partial\eta/\partial z$ at each interior interface, and decay in the top
//! layer yields a dense $2N_l \times 2N_l$ complex system per mode. Modes are
//! independent; each system is solved by LU decomposition.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use faer::linalg::solvers::SpSolver;

use crate::dispersion;
use crate::error::WaveError;
use crate::grid::SampleAxis;
use crate::reconstruct;
use crate::transform;
use crate::types::{FlowVariable, LayerSpec};

/// Steady model over a stack of uniform layers.
///
/// The per-mode amplitude pairs are solved once at construction; `solve` is
/// a pure read of the stored coefficients.
#[derive(Debug, Clone)]
pub struct MultiLayerModel {
    axis: SampleAxis,
    layers: Vec<LayerSpec>,
    /// One-sided horizontal wavenumbers.
    k: Array1<f64>,
    /// Vertical wavenumbers, `(layer, mode)`.
    m: Array2<Complex64>,
    /// Up-going amplitude $A_l$ per `(layer, mode)`.
    up: Array2<Complex64>,
    /// Down-going amplitude $B_l$ per `(layer, mode)`; identically zero in
    /// the top layer.
    down: Array2<Complex64>,
}

impl MultiLayerModel {
    /// Construct the model and solve the per-mode interface systems.
    ///
    /// # Arguments
    /// * `x` - Equidistant sample positions (even count).
    /// * `terrain` - Surface elevation at each sample, real and finite.
    /// * `layers` - Layer stack, bottom-up; the first base height must be 0
    ///   and base heights must be strictly increasing.
    pub fn new(x: &[f64], terrain: &[f64], layers: &[LayerSpec]) -> Result<Self, WaveError> {
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
        validate_layers(layers)?;

        let n_layers = layers.len();
        let k = axis.one_sided_wavenumbers();
        let n_modes = k.len();
        let hc = transform::forward_1d(terrain)?;

        let mut m = Array2::<Complex64>::zeros((n_layers, n_modes));
        for (l, layer) in layers.iter().enumerate() {
            let ml = dispersion::steady_wavenumbers(&k, layer.wind, layer.buoyancy);
            for j in 0..n_modes {
                m[[l, j]] = ml[j];
            }
        }

        // Layer thicknesses; the top layer gets zero so its (unused, pinned
        // to zero) down-going phase factor degenerates to one.
        let thickness: Vec<f64> = (0..n_layers)
            .map(|l| {
                if l + 1 < n_layers {
                    layers[l + 1].base_height - layers[l].base_height
                } else {
                    0.0
                }
            })
            .collect();

        log::debug!(
            "solving {} interface systems of dimension {}",
            n_modes,
            2 * n_layers
        );

        let mut up = Array2::<Complex64>::zeros((n_layers, n_modes));
        let mut down = Array2::<Complex64>::zeros((n_layers, n_modes));
        for j in 0..n_modes {
            let (a, b) = solve_mode(&m, &thickness, k[j], hc[j], j)?;
            for l in 0..n_layers {
                up[[l, j]] = a[l];
                down[[l, j]] = b[l];
            }
        }

        Ok(Self {
            axis,
            layers: layers.to_vec(),
            k,
            m,
            up,
            down,
        })
    }

    /// Sample positions of the underlying grid.
    pub fn positions(&self) -> &[f64] {
        self.axis.positions()
    }

    /// The layer stack this model was built from.
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    /// Solve for a flow variable at the given heights.
    ///
    /// Only displacement and vertical velocity are available for layered
    /// stacks; horizontal velocity and pressure reconstruction across
    /// interfaces is unsupported and reported as such.
    pub fn solve(&self, variable: FlowVariable, heights: &[f64]) -> Result<Array2<f64>, WaveError> {
        match variable {
            FlowVariable::Displacement | FlowVariable::VerticalVelocity => {}
            _ => {
                return Err(WaveError::Unsupported {
                    variable,
                    model: "multi-layer",
                })
            }
        }
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
        let n_layers = self.layers.len();
        let n_modes = self.k.len();

        let mut field = Array2::<Complex64>::zeros((n_modes, heights.len()));
        for (jz, &z) in heights.iter().enumerate() {
            let l = self.layer_index(z);
            let base = self.layers[l].base_height;
            for j in 0..n_modes {
                let ml = self.m[[l, j]];
                let mut eta = self.up[[l, j]] * (i * ml * (z - base)).exp();
                if l + 1 < n_layers {
                    // The top layer's down-going term is pinned to zero and
                    // its phase reference would grow without bound, so it is
                    // omitted rather than masked.
                    let top = self.layers[l + 1].base_height;
                    eta += self.down[[l, j]] * (-i * ml * (z - top)).exp();
                }
                field[[j, jz]] = match variable {
                    FlowVariable::VerticalVelocity => {
                        i * self.layers[l].wind * self.k[j] * eta
                    }
                    _ => eta,
                };
            }
        }

        reconstruct::to_physical_1d(field, self.axis.len(), "multi-layer field")
    }

    /// Solve for a flow variable at a single height.
    pub fn solve_at(&self, variable: FlowVariable, height: f64) -> Result<Array1<f64>, WaveError> {
        let field = self.solve(variable, &[height])?;
        Ok(field.column(0).to_owned())
    }

    /// Index of the layer whose half-open interval contains `z` (the top
    /// layer is open above).
    fn layer_index(&self, z: f64) -> usize {
        self.layers
            .iter()
            .rposition(|layer| layer.base_height <= z)
            .unwrap_or(0)
    }
}

fn validate_layers(layers: &[LayerSpec]) -> Result<(), WaveError> {
    if layers.is_empty() {
        return Err(WaveError::InvalidParameter(
            "at least one layer is required".into(),
        ));
    }
    if layers[0].base_height != 0.0 {
        return Err(WaveError::InvalidParameter(format!(
            "the bottom layer must start at the surface, got base height {}",
            layers[0].base_height
        )));
    }
    for pair in layers.windows(2) {
        if !(pair[1].base_height > pair[0].base_height) {
            return Err(WaveError::InvalidParameter(format!(
                "interface heights must be strictly increasing, got {} after {}",
                pair[1].base_height, pair[0].base_height
            )));
        }
    }
    for (l, layer) in layers.iter().enumerate() {
        if !layer.base_height.is_finite() {
            return Err(WaveError::InvalidParameter(format!(
                "layer {} has a non-finite base height",
                l
            )));
        }
        if layer.wind == 0.0 {
            return Err(WaveError::InvalidParameter(format!(
                "layer {} has zero wind speed",
                l
            )));
        }
        if !(layer.buoyancy.is_finite() && layer.buoyancy >= 0.0) {
            return Err(WaveError::InvalidParameter(format!(
                "layer {} has an invalid buoyancy frequency {}",
                l, layer.buoyancy
            )));
        }
    }
    Ok(())
}

/// Assemble and solve the $2N_l \times 2N_l$ system of one spectral mode.
///
/// Unknowns are ordered $[A_0, B_0, A_1, B_1, \dots]$. Rows: the surface
/// forcing $\eta_0(0) = h_c$, then per interior interface one continuity row
/// for $\eta$ and one for $\partial\eta/\partial z$, then the top-layer decay
/// row $B_{N_l-1} = 0$. At the zero wavenumber the derivative rows vanish
/// identically and are each replaced by the identity constraint
/// $B_{l-1} = 0$, which keeps the system nonsingular.
fn solve_mode(
    m: &Array2<Complex64>,
    thickness: &[f64],
    k: f64,
    hc: Complex64,
    mode: usize,
) -> Result<(Vec<Complex64>, Vec<Complex64>), WaveError> {
    let i = Complex64::i();
    let n_layers = thickness.len();
    let dim = 2 * n_layers;

    // Per-layer phase factor across the layer's own thickness; magnitude is
    // at most one for the admissible branch.
    let phase: Vec<Complex64> = (0..n_layers)
        .map(|l| (i * m[[l, mode]] * thickness[l]).exp())
        .collect();

    let mut matrix = Array2::<Complex64>::zeros((dim, dim));
    let mut rhs = Array1::<Complex64>::zeros(dim);

    // Surface row: A_0 + B_0 e_0 = hc.
    matrix[[0, 0]] = Complex64::from(1.0);
    matrix[[0, 1]] = phase[0];
    rhs[0] = hc;

    for l in 1..n_layers {
        let below = l - 1;
        let (cb, ca) = (2 * below, 2 * l);
        let m_below = m[[below, mode]];
        let m_above = m[[l, mode]];

        // Continuity of eta at interface l.
        let row = 2 * l - 1;
        matrix[[row, cb]] = phase[below];
        matrix[[row, cb + 1]] = Complex64::from(1.0);
        matrix[[row, ca]] = Complex64::from(-1.0);
        matrix[[row, ca + 1]] = -phase[l];

        // Continuity of d(eta)/dz, or the zero-wavenumber identity patch.
        let row = 2 * l;
        if k == 0.0 {
            matrix[[row, cb + 1]] = Complex64::from(1.0);
        } else {
            matrix[[row, cb]] = m_below * phase[below];
            matrix[[row, cb + 1]] = -m_below;
            matrix[[row, ca]] = -m_above;
            matrix[[row, ca + 1]] = m_above * phase[l];
        }
    }

    // Top row: decay in the semi-infinite top layer.
    matrix[[dim - 1, dim - 1]] = Complex64::from(1.0);

    // LU decomposition with partial pivoting.
    let faer_mat = faer::Mat::<faer::complex_native::c64>::from_fn(dim, dim, |r, c| {
        let v = matrix[[r, c]];
        faer::complex_native::c64::new(v.re, v.im)
    });
    let faer_rhs = faer::Col::<faer::complex_native::c64>::from_fn(dim, |r| {
        let v = rhs[r];
        faer::complex_native::c64::new(v.re, v.im)
    });
    let lu = faer_mat.partial_piv_lu();
    let sol = lu.solve(&faer_rhs);

    let mut a = Vec::with_capacity(n_layers);
    let mut b = Vec::with_capacity(n_layers);
    for l in 0..n_layers {
        let av = Complex64::new(sol[2 * l].re, sol[2 * l].im);
        let bv = Complex64::new(sol[2 * l + 1].re, sol[2 * l + 1].im);
        if !(av.re.is_finite() && av.im.is_finite() && bv.re.is_finite() && bv.im.is_finite()) {
            return Err(WaveError::SingularSystem { mode });
        }
        a.push(av);
        b.push(bv);
    }
    Ok((a, b))
}
