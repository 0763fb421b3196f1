use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

// ---------------------------------------------------------------------------
// Airframe (everything but the motor's thrust)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Airframe {
    pub name: String,
    pub dry_mass: f64,        // kg, body + recovery + spent casing
    pub propellant_mass: f64, // kg
    pub diameter: f64,        // m
    pub length: f64,          // m
    pub cd: f64,              // drag coefficient (dimensionless)
}

impl Default for Airframe {
    /// Alpha III class model rocket.
    fn default() -> Self {
        Self {
            name: "Alpha III".into(),
            dry_mass: 0.034,
            propellant_mass: 0.012,
            diameter: 0.0248,
            length: 0.311,
            cd: 0.3,
        }
    }
}

impl Airframe {
    /// Frontal reference area from the body diameter, m^2.
    pub fn area(&self) -> f64 {
        PI * (self.diameter / 2.0).powi(2)
    }

    /// Wet mass at ignition.
    pub fn total_mass(&self) -> f64 {
        self.dry_mass + self.propellant_mass
    }

    /// Mass after `elapsed` seconds of a `burn_time` second burn, with
    /// propellant consumed linearly.
    pub fn mass_at(&self, elapsed: f64, burn_time: f64) -> f64 {
        let burned = (elapsed / burn_time).clamp(0.0, 1.0);
        self.dry_mass + self.propellant_mass * (1.0 - burned)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.dry_mass > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "airframe '{}': dry mass must be positive",
                self.name
            )));
        }
        if !(self.propellant_mass >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "airframe '{}': propellant mass must be non-negative",
                self.name
            )));
        }
        if !(self.diameter >= 0.0) || !(self.cd >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "airframe '{}': diameter and cd must be non-negative",
                self.name
            )));
        }
        Ok(())
    }
}
