use thiserror::Error;

/// Errors surfaced by the flight core.
///
/// Numerical edge cases (zero relative airspeed, non-positive mass, runaway
/// flights) are clamped inside the integrator and never show up here. These
/// variants cover host-side configuration mistakes.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown engine '{0}'")]
    UnknownEngine(String),

    #[error("invalid engine '{name}': {reason}")]
    InvalidEngine { name: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
