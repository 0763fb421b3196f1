pub mod airframe;
pub mod engine;

pub use airframe::Airframe;
pub use engine::{EngineCatalog, EngineProfile};
