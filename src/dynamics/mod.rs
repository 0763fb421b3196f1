pub mod state;

pub use state::{FlightPhase, FlightTrace, RocketState, Sample};
