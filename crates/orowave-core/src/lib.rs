//! # Orowave Core
//!
//! The numerical backbone of the Orowave framework. This crate solves the
//! linear buoyancy-wave response of a stratified, horizontally-moving fluid
//! to undulating terrain, analytically in the Fourier domain: each horizontal
//! wavenumber is an independent boundary-value problem in the vertical.
//!
//! ## Architecture
//!
//! Terrain and grid are captured once at model construction, together with
//! the per-mode spectral state (horizontal wavenumber, complex vertical
//! wavenumber, terrain amplitude). A `solve` call is a pure read of that
//! state: it applies the spectral operator for the requested flow variable,
//! evaluates the vertical structure at the requested heights, and inverts the
//! transform back to physical space.
//!
//! ## Modules
//!
//! - [`grid`] — Equidistant sample axes and their spectral wavenumbers.
//! - [`dispersion`] — Vertical-wavenumber branch selection.
//! - [`transform`] — Forward/inverse real spectral transforms (normalisation
//!   on the forward pass).
//! - [`solver`] — The wave models: one-layer steady ([`solver::steady`]),
//!   layered steady ([`solver::multilayer`]), transient
//!   ([`solver::transient`]), and two-dimensional steady
//!   ([`solver::planform`]).
//! - [`reconstruct`] — Defunct-mode handling and inverse-transform drive.
//! - [`types`] — Flow variables and layer parameter records.
//! - [`error`] — The [`error::WaveError`] taxonomy.

pub mod dispersion;
pub mod error;
pub mod grid;
pub mod reconstruct;
pub mod solver;
pub mod transform;
pub mod types;

pub use error::WaveError;
pub use types::FlowVariable;
