pub mod batch;
pub mod control;
pub mod event;
pub mod flight;
pub mod integrator;
pub mod landing;
pub mod runner;

pub use batch::{run_batch, BatchSummary, WindRange};
pub use control::{DeployAt, DeployAtApogee, DeployController, NeverDeploy};
pub use event::{EventKind, FlightEvent};
pub use flight::{Flight, Landing, PhaseSignal};
pub use integrator::euler_step;
pub use landing::{classify, FieldGeometry, LandingOutcome};
pub use runner::{FlightReport, Simulator, Termination};
