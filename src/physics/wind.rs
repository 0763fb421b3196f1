use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::dynamics::state::FlightPhase;

/// Constant wind vector for one flight.
///
/// `direction_deg` is measured counter-clockwise from +x, so 0 blows toward
/// +x and 90 toward +y.
pub fn wind_vector(speed: f64, direction_deg: f64) -> Vector2<f64> {
    let theta = direction_deg.to_radians();
    Vector2::new(speed * theta.cos(), speed * theta.sin())
}

// ---------------------------------------------------------------------------
// Phase-scaled horizontal drift
// ---------------------------------------------------------------------------

/// Fraction of the horizontal wind component applied as an extra sideways
/// force, per flight phase.
///
/// Drag coupling alone barely moves a model rocket sideways; this is a
/// gameplay knob, not an aerodynamic force.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindDrift {
    pub powered: f64,
    pub coast: f64,
    pub parachute: f64,
}

impl Default for WindDrift {
    fn default() -> Self {
        Self {
            powered: 0.02,
            coast: 0.03,
            parachute: 0.05,
        }
    }
}

impl WindDrift {
    /// Drift disabled; wind acts through drag only.
    pub fn none() -> Self {
        Self {
            powered: 0.0,
            coast: 0.0,
            parachute: 0.0,
        }
    }

    pub fn fraction(&self, phase: FlightPhase) -> f64 {
        match phase {
            FlightPhase::Ascent => self.powered,
            FlightPhase::Coast => self.coast,
            FlightPhase::Descent => self.parachute,
            FlightPhase::Landed => 0.0,
        }
    }
}

/// Horizontal nudge `(wind.x * fraction(phase), 0)`.
pub fn wind_perturbation(phase: FlightPhase, wind: &Vector2<f64>, drift: &WindDrift) -> Vector2<f64> {
    Vector2::new(wind.x * drift.fraction(phase), 0.0)
}
