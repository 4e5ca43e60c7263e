//! Wave models.
//!
//! All models share the same construction contract: the grid, terrain and
//! flow parameters are validated and transformed once, the per-mode spectral
//! state (`k`, `m`, `hc`) is computed, and the model becomes immutable. Each
//! `solve` call is a pure read dispatching on the requested
//! [`crate::FlowVariable`] and target heights.
//!
//! The boundary configurations the one-layer models close with are expressed
//! as a tagged variant rather than a type hierarchy, so the shared dispersion
//! contract in [`crate::dispersion`] stays explicit and independently
//! testable.

pub mod multilayer;
pub mod planform;
pub mod steady;
pub mod transient;

use crate::error::WaveError;

/// Top boundary configuration of a one-layer model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
    /// Semi-infinite half-plane above the terrain; the radiation condition
    /// selects the vertical-wavenumber branch and no top constraint is
    /// needed.
    HalfPlane,
    /// Rigid, impermeable lid at the given height (> 0); the wave field is a
    /// standing combination of an upward and a reflected component.
    RigidLid { height: f64 },
}

impl BoundaryCondition {
    /// Check a set of target heights against the boundary's valid domain.
    ///
    /// Violations are precondition failures, never silent clamps.
    pub(crate) fn validate_heights(&self, heights: &[f64]) -> Result<(), WaveError> {
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
            if let BoundaryCondition::RigidLid { height: lid } = *self {
                if z > lid {
                    return Err(WaveError::HeightOutOfRange {
                        height: z,
                        domain: format!("0 <= z <= {}", lid),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_plane_accepts_any_nonnegative_height() {
        let bc = BoundaryCondition::HalfPlane;
        assert!(bc.validate_heights(&[0.0, 1.0, 1e7]).is_ok());
        assert!(bc.validate_heights(&[-0.1]).is_err());
    }

    #[test]
    fn test_rigid_lid_bounds_heights_above() {
        let bc = BoundaryCondition::RigidLid { height: 100.0 };
        assert!(bc.validate_heights(&[0.0, 50.0, 100.0]).is_ok());
        assert!(bc.validate_heights(&[100.1]).is_err());
    }

    #[test]
    fn test_empty_height_list_is_rejected() {
        assert!(BoundaryCondition::HalfPlane.validate_heights(&[]).is_err());
    }
}
