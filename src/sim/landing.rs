use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

// ---------------------------------------------------------------------------
// Landing classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LandingOutcome {
    Field,
    Trees,
}

impl fmt::Display for LandingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandingOutcome::Field => f.write_str("field"),
            LandingOutcome::Trees => f.write_str("trees"),
        }
    }
}

/// `Field` iff `0 <= x <= field_length`, otherwise `Trees`.
pub fn classify(x: f64, field_length: f64) -> LandingOutcome {
    if (0.0..=field_length).contains(&x) {
        LandingOutcome::Field
    } else {
        LandingOutcome::Trees
    }
}

// ---------------------------------------------------------------------------
// Field geometry
// ---------------------------------------------------------------------------

/// Football field flanked by tree lines on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldGeometry {
    pub length: f64,       // m, along x
    pub width: f64,        // m, informational
    pub tree_height: f64,  // m, canopy where a drifting rocket gets stuck
}

impl Default for FieldGeometry {
    fn default() -> Self {
        // 120 yd x 53 yd including end zones
        Self {
            length: 109.7,
            width: 48.8,
            tree_height: 6.0,
        }
    }
}

impl FieldGeometry {
    pub fn classify(&self, x: f64) -> LandingOutcome {
        classify(x, self.length)
    }

    /// Altitude at which a rocket over the given zone counts as landed.
    pub fn terminal_altitude(&self, outcome: LandingOutcome) -> f64 {
        match outcome {
            LandingOutcome::Field => 0.0,
            LandingOutcome::Trees => self.tree_height,
        }
    }

    /// Launch pad at the center of the field.
    pub fn launch_point(&self) -> Vector2<f64> {
        Vector2::new(self.length / 2.0, 0.0)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.length > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "field length must be positive, got {}",
                self.length
            )));
        }
        if !(self.tree_height >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "tree height must be non-negative, got {}",
                self.tree_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_bounds_are_inclusive() {
        assert_eq!(classify(0.0, 109.7), LandingOutcome::Field);
        assert_eq!(classify(54.85, 109.7), LandingOutcome::Field);
        assert_eq!(classify(109.7, 109.7), LandingOutcome::Field);
    }

    #[test]
    fn outside_the_field_is_trees() {
        assert_eq!(classify(-0.01, 109.7), LandingOutcome::Trees);
        assert_eq!(classify(109.71, 109.7), LandingOutcome::Trees);
        assert_eq!(classify(f64::NAN, 109.7), LandingOutcome::Trees);
    }

    #[test]
    fn terminal_altitude_depends_on_zone() {
        let field = FieldGeometry::default();
        assert_eq!(field.terminal_altitude(LandingOutcome::Field), 0.0);
        assert_eq!(field.terminal_altitude(LandingOutcome::Trees), 6.0);
        assert_eq!(field.launch_point(), Vector2::new(54.85, 0.0));
    }
}
