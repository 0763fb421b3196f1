use nalgebra::Vector2;

use crate::dynamics::state::{FlightPhase, RocketState};
use super::landing::LandingOutcome;

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    Burnout,
    Apogee,
    ParachuteDeployed,
    Landing(LandingOutcome),
    TimeLimit,
}

/// A discrete event that occurred during a flight.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightEvent {
    pub time: f64,
    pub kind: EventKind,
    pub pos: Vector2<f64>,
}

impl FlightEvent {
    pub fn at(state: &RocketState, kind: EventKind) -> Self {
        Self {
            time: state.time,
            kind,
            pos: state.pos,
        }
    }
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive states and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &RocketState, current: &RocketState) -> Option<EventKind>;
}

/// Detects apogee (vertical velocity going from positive to non-positive).
/// Fires at most once per flight.
#[derive(Debug, Default)]
pub struct ApogeeDetector {
    fired: bool,
}

impl EventDetector for ApogeeDetector {
    fn check(&mut self, prev: &RocketState, current: &RocketState) -> Option<EventKind> {
        if !self.fired && prev.vel.y > 0.0 && current.vel.y <= 0.0 {
            self.fired = true;
            Some(EventKind::Apogee)
        } else {
            None
        }
    }
}

/// Detects the end of the powered phase.
#[derive(Debug, Default)]
pub struct BurnoutDetector;

impl EventDetector for BurnoutDetector {
    fn check(&mut self, prev: &RocketState, current: &RocketState) -> Option<EventKind> {
        if prev.phase == FlightPhase::Ascent && current.phase == FlightPhase::Coast {
            Some(EventKind::Burnout)
        } else {
            None
        }
    }
}
