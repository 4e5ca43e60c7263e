//! Error taxonomy for the wave solvers.
//!
//! Preconditions are checked before any numeric work; numeric degeneracies
//! (the zero-wavenumber mode, masked exponential overflow) are recovered
//! locally and never surface here. A non-finite value remaining in an
//! assembled spectral field after masking indicates an internal construction
//! bug and is reported as [`WaveError::NonFiniteField`].

use thiserror::Error;

use crate::types::FlowVariable;

/// Errors that can occur while constructing or solving a wave model.
#[derive(Debug, Error)]
pub enum WaveError {
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Height {height} lies outside the valid domain {domain}")]
    HeightOutOfRange { height: f64, domain: String },

    #[error("Solving for '{variable}' is not supported by the {model} model")]
    Unsupported {
        variable: FlowVariable,
        model: &'static str,
    },

    #[error("Interface system is singular at spectral mode {mode}")]
    SingularSystem { mode: usize },

    #[error("Non-finite value in assembled spectral field: {0}")]
    NonFiniteField(String),

    #[error("Transform backend error: {0}")]
    Transform(String),
}
