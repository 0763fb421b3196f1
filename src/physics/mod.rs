pub mod aerodynamics;
pub mod gravity;
pub mod thrust;
pub mod wind;

pub use aerodynamics::drag_force;
pub use gravity::{gravity_force, G_EARTH};
pub use thrust::thrust_force;
pub use wind::{wind_perturbation, wind_vector, WindDrift};
