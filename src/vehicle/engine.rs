use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

// ---------------------------------------------------------------------------
// Engine profile (one hobby motor class)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineProfile {
    pub name: String,
    pub total_impulse: f64,   // N·s
    pub average_thrust: f64,  // N
    pub burn_time: f64,       // s
    pub igniter_delay: f64,   // s, burnout to ejection charge
}

impl EngineProfile {
    pub fn new(
        name: impl Into<String>,
        total_impulse: f64,
        average_thrust: f64,
        burn_time: f64,
        igniter_delay: f64,
    ) -> Self {
        Self {
            name: name.into(),
            total_impulse,
            average_thrust,
            burn_time,
            igniter_delay,
        }
    }

    /// Earliest time after ignition at which the ejection charge may deploy
    /// the parachute.
    pub fn deploy_window_opens(&self) -> f64 {
        self.burn_time + self.igniter_delay
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |reason: &str| SimError::InvalidEngine {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if !(self.burn_time > 0.0) {
            return Err(invalid("burn time must be positive"));
        }
        if !(self.average_thrust >= 0.0) {
            return Err(invalid("average thrust must be non-negative"));
        }
        if !(self.igniter_delay >= 0.0) {
            return Err(invalid("igniter delay must be non-negative"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Engine catalog
// ---------------------------------------------------------------------------

/// Immutable lookup from selector key ("A", "B", "C", ...) to engine profile.
///
/// Built once at startup and handed to the simulator by reference.
#[derive(Debug, Clone, Default)]
pub struct EngineCatalog {
    engines: BTreeMap<String, EngineProfile>,
}

impl EngineCatalog {
    /// The three Estes-style motors offered by the game.
    pub fn standard() -> Self {
        let engines = [
            ("A", EngineProfile::new("A8-3", 2.5, 8.0, 0.3125, 3.0)),
            ("B", EngineProfile::new("B6-4", 5.0, 6.0, 0.833, 4.0)),
            ("C", EngineProfile::new("C6-5", 10.0, 6.0, 1.667, 5.0)),
        ]
        .into_iter()
        .map(|(key, engine)| (key.to_string(), engine))
        .collect();
        Self { engines }
    }

    /// Build a catalog from explicit entries, validating each profile.
    /// Keys are case-insensitive; later entries replace earlier ones.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, SimError>
    where
        I: IntoIterator<Item = (K, EngineProfile)>,
        K: AsRef<str>,
    {
        let mut engines = BTreeMap::new();
        for (key, engine) in entries {
            engine.validate()?;
            engines.insert(normalize_key(key.as_ref()), engine);
        }
        Ok(Self { engines })
    }

    /// Standard catalog extended (or overridden) by `extra`.
    pub fn standard_with<I, K>(extra: I) -> Result<Self, SimError>
    where
        I: IntoIterator<Item = (K, EngineProfile)>,
        K: AsRef<str>,
    {
        let standard = Self::standard().engines.into_iter();
        let extra: Vec<(String, EngineProfile)> = extra
            .into_iter()
            .map(|(k, e)| (k.as_ref().to_string(), e))
            .collect();
        Self::from_entries(standard.chain(extra))
    }

    pub fn get(&self, key: &str) -> Result<&EngineProfile, SimError> {
        self.engines
            .get(&normalize_key(key))
            .ok_or_else(|| SimError::UnknownEngine(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.engines.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EngineProfile)> {
        self.engines.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_uppercase()
}
