//! Core types shared across the Orowave framework.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Physical flow variable that a model can reconstruct.
///
/// All variables are small perturbations about the uniform background flow.
/// Not every model supports every variable; unsupported combinations are
/// reported via [`crate::WaveError::Unsupported`] rather than silently
/// substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowVariable {
    /// Vertical displacement of a streamline, η.
    Displacement,
    /// Vertical velocity perturbation, w.
    VerticalVelocity,
    /// Streamwise horizontal velocity perturbation, u.
    HorizontalVelocity,
    /// Spanwise horizontal velocity perturbation, v (planform grids only).
    SpanwiseVelocity,
    /// Pressure perturbation (kinematic, i.e. divided by density), p.
    Pressure,
}

impl FlowVariable {
    /// Conventional short symbol for the variable.
    pub fn symbol(&self) -> &'static str {
        match self {
            FlowVariable::Displacement => "eta",
            FlowVariable::VerticalVelocity => "w",
            FlowVariable::HorizontalVelocity => "u",
            FlowVariable::SpanwiseVelocity => "v",
            FlowVariable::Pressure => "p",
        }
    }
}

impl fmt::Display for FlowVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for FlowVariable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eta" | "displacement" => Ok(FlowVariable::Displacement),
            "w" | "vertical_velocity" => Ok(FlowVariable::VerticalVelocity),
            "u" | "horizontal_velocity" => Ok(FlowVariable::HorizontalVelocity),
            "v" | "spanwise_velocity" => Ok(FlowVariable::SpanwiseVelocity),
            "p" | "pressure" => Ok(FlowVariable::Pressure),
            other => Err(format!(
                "Unknown flow variable '{}'. Valid names: eta, w, u, v, p",
                other
            )),
        }
    }
}

/// Governing parameters of one layer in a multi-layer stack.
///
/// A stack is described bottom-up: the first layer must have
/// `base_height == 0.0` and base heights must be strictly increasing. The
/// topmost layer extends to infinity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Height of the layer's lower interface (m).
    pub base_height: f64,
    /// Background wind speed inside the layer (m/s). Must be nonzero.
    pub wind: f64,
    /// Buoyancy (Brunt–Väisälä) frequency inside the layer (1/s). Must be
    /// non-negative.
    pub buoyancy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_names_round_trip() {
        for var in [
            FlowVariable::Displacement,
            FlowVariable::VerticalVelocity,
            FlowVariable::HorizontalVelocity,
            FlowVariable::SpanwiseVelocity,
            FlowVariable::Pressure,
        ] {
            let parsed: FlowVariable = var.symbol().parse().unwrap();
            assert_eq!(parsed, var);
        }
    }

    #[test]
    fn test_unknown_variable_is_rejected() {
        assert!("q".parse::<FlowVariable>().is_err());
    }
}
