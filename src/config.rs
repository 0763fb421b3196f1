//! Simulation configuration and its TOML loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::physics::aerodynamics::AIR_DENSITY_SEA_LEVEL;
use crate::physics::{WindDrift, G_EARTH};
use crate::sim::landing::FieldGeometry;
use crate::vehicle::{Airframe, EngineCatalog, EngineProfile};

/// Who decides when the parachute comes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployPolicy {
    /// Ejection charge fires on its own once the delay has elapsed and the
    /// rocket has stopped climbing. Host requests are ignored.
    #[default]
    Automatic,
    /// Only an explicit host request deploys, and only after burnout.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,              // integration timestep, s
    pub max_time: f64,        // safety bound on simulated time, s
    pub gravity: f64,         // m/s^2
    pub air_density: f64,     // kg/m^3
    pub field: FieldGeometry,
    pub wind_drift: WindDrift,
    pub deploy_policy: DeployPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,         // 100 Hz
            max_time: 300.0,  // 5 min ceiling
            gravity: G_EARTH,
            air_density: AIR_DENSITY_SEA_LEVEL,
            field: FieldGeometry::default(),
            wind_drift: WindDrift::default(),
            deploy_policy: DeployPolicy::Automatic,
        }
    }
}

/// Longest flight a config may ask for, in ticks.
pub const MAX_STEPS: f64 = 1e8;

impl SimConfig {
    /// Game mode: one coarse step per rendered frame, player pulls the chute.
    pub fn interactive() -> Self {
        Self {
            dt: 0.033,
            deploy_policy: DeployPolicy::Manual,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.dt > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        if !(self.max_time > 0.0) || !self.max_time.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "max_time must be positive and finite, got {}",
                self.max_time
            )));
        }
        if self.max_time / self.dt > MAX_STEPS {
            return Err(SimError::InvalidConfig(format!(
                "max_time {} s at dt {} s exceeds {:e} steps",
                self.max_time, self.dt, MAX_STEPS
            )));
        }
        if !(self.air_density >= 0.0) || !self.gravity.is_finite() {
            return Err(SimError::InvalidConfig(
                "gravity must be finite and air density non-negative".into(),
            ));
        }
        self.field.validate()
    }

    /// Same config with only the deploy policy swapped.
    pub fn with_deploy_policy(self, deploy_policy: DeployPolicy) -> Self {
        Self {
            deploy_policy,
            ..self
        }
    }

    /// Upper bound on ticks a flight can take before the safety bound trips.
    pub fn step_budget(&self) -> usize {
        ((self.max_time / self.dt).ceil() as usize).saturating_add(1)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, SimError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a bare `SimConfig` table; missing keys take their defaults.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

// ---------------------------------------------------------------------------
// Settings file: [sim], [airframe], [engines.<KEY>]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sim: SimConfig,
    pub airframe: Airframe,
    /// Extra motors, merged over the standard catalog.
    pub engines: BTreeMap<String, EngineProfile>,
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> Result<Self, SimError> {
        let settings: Self = toml::from_str(contents)?;
        settings.sim.validate()?;
        settings.airframe.validate()?;
        for engine in settings.engines.values() {
            engine.validate()?;
        }
        Ok(settings)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn catalog(&self) -> Result<EngineCatalog, SimError> {
        EngineCatalog::standard_with(self.engines.clone())
    }
}
