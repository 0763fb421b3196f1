use crate::dynamics::state::RocketState;

/// Host-side parachute trigger, polled once per tick before the physics step.
///
/// Stands in for the player's deploy button when a flight is driven to
/// completion without a UI. Only consulted under the manual deploy policy.
pub trait DeployController {
    /// Return `true` to request deployment on this tick.
    fn wants_deploy(&mut self, state: &RocketState) -> bool;

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Never pulls the chute; the rocket falls ballistically under manual policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverDeploy;

impl DeployController for NeverDeploy {
    fn wants_deploy(&mut self, _state: &RocketState) -> bool {
        false
    }

    fn name(&self) -> &str {
        "never"
    }
}

/// Requests deployment on every tick from `time` onward.
#[derive(Debug, Clone, Copy)]
pub struct DeployAt {
    pub time: f64,
}

impl DeployController for DeployAt {
    fn wants_deploy(&mut self, state: &RocketState) -> bool {
        state.time >= self.time
    }

    fn name(&self) -> &str {
        "timed"
    }
}

/// Requests deployment at the first tick the rocket is no longer climbing,
/// mimicking a player who presses the button at apogee.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeployAtApogee;

impl DeployController for DeployAtApogee {
    fn wants_deploy(&mut self, state: &RocketState) -> bool {
        state.vel.y <= 0.0 && state.time > 0.0
    }

    fn name(&self) -> &str {
        "apogee"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::FlightPhase;
    use nalgebra::Vector2;

    fn state(time: f64, vy: f64) -> RocketState {
        RocketState {
            time,
            pos: Vector2::new(54.85, 100.0),
            vel: Vector2::new(0.0, vy),
            mass: 0.034,
            dry_mass: 0.034,
            parachute_deployed: false,
            phase: FlightPhase::Coast,
        }
    }

    #[test]
    fn timed_trigger_waits_for_its_time() {
        let mut c = DeployAt { time: 4.0 };
        assert!(!c.wants_deploy(&state(3.99, 10.0)));
        assert!(c.wants_deploy(&state(4.0, 10.0)));
    }

    #[test]
    fn apogee_trigger_waits_for_descent() {
        let mut c = DeployAtApogee;
        assert!(!c.wants_deploy(&state(0.0, 0.0)));
        assert!(!c.wants_deploy(&state(5.0, 3.0)));
        assert!(c.wants_deploy(&state(9.5, -0.1)));
        assert!(!NeverDeploy.wants_deploy(&state(9.5, -0.1)));
    }
}
