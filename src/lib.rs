pub mod config;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod physics;
pub mod sim;
pub mod vehicle;

pub use config::{DeployPolicy, Settings, SimConfig};
pub use dynamics::{FlightPhase, FlightTrace, RocketState, Sample};
pub use error::SimError;
pub use sim::{Flight, FlightReport, LandingOutcome, PhaseSignal, Simulator, Termination};
pub use vehicle::{Airframe, EngineCatalog, EngineProfile};

// Host-facing shortcuts
pub mod batch {
    pub use crate::sim::batch::{run_batch, BatchSummary, WindRange};
}

pub mod export {
    pub use crate::io::csv::{write_trace, write_trace_file};
    pub use crate::io::json::{write_batch, write_summary, write_summary_file, FlightSummary};
}
