use nalgebra::Vector2;

use crate::vehicle::EngineProfile;

/// Motor thrust at `elapsed` seconds after ignition.
///
/// Constant-thrust step in place of a real thrust curve: the motor pushes
/// straight up with its average thrust while `elapsed <= burn_time`.
pub fn thrust_force(elapsed: f64, engine: &EngineProfile) -> Vector2<f64> {
    if elapsed <= engine.burn_time {
        Vector2::new(0.0, engine.average_thrust)
    } else {
        Vector2::zeros()
    }
}
