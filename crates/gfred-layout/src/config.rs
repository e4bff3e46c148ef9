//! Force-directed layout parameters.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::position::Position;

/// Parameters of the force-directed solver.
///
/// Values are in screen units. The defaults suit an interactive editor panel
/// and favour responsiveness over convergence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of force iterations.
    pub iterations: usize,
    /// Numerator of the inverse-square repulsion between every node pair.
    pub repulsion_strength: f64,
    /// Spring constant along edges, scaled by 0.01.
    pub attraction_strength: f64,
    /// Step multiplier of the first iteration.
    pub damping: f64,
    /// Factor applied to the step multiplier after every iteration.
    pub damping_decay: f64,
    /// Radius of the initial circle.
    pub radius: f64,
    /// Centre of the initial circle.
    pub center: Position,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 5,
            repulsion_strength: 5000.0,
            attraction_strength: 1.0,
            damping: 0.9,
            damping_decay: 0.95,
            radius: 200.0,
            center: Position::new(400.0, 300.0),
        }
    }
}

impl LayoutConfig {
    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("repulsion_strength", self.repulsion_strength),
            ("attraction_strength", self.attraction_strength),
            ("radius", self.radius),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::invalid_config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        let unit = [
            ("damping", self.damping),
            ("damping_decay", self.damping_decay),
        ];
        for (name, value) in unit {
            if !(value > 0.0 && value <= 1.0) {
                return Err(LayoutError::invalid_config(format!(
                    "{name} must lie in (0, 1], got {value}"
                )));
            }
        }

        if !self.center.is_finite() {
            return Err(LayoutError::invalid_config("center must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let config = LayoutConfig {
            damping: 0.0,
            ..LayoutConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LayoutConfig {
            repulsion_strength: f64::NAN,
            ..LayoutConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("repulsion_strength"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"iterations": 12, "center": {"x": 0.0, "y": 0.0}}"#).unwrap();
        assert_eq!(config.iterations, 12);
        assert_eq!(config.radius, 200.0);
        assert_eq!(config.center, Position::ZERO);
    }
}
