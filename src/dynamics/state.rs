use std::fmt;

use nalgebra::Vector2;
use serde::Serialize;

use crate::vehicle::Airframe;

// ---------------------------------------------------------------------------
// Flight phase
// ---------------------------------------------------------------------------

/// Phase tag of the flight state machine: `Ascent -> Coast -> Descent -> Landed`.
///
/// `Descent` means "under parachute". A rocket that is never deployed falls
/// back to earth in `Coast`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightPhase {
    Ascent,
    Coast,
    Descent,
    Landed,
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlightPhase::Ascent => "BURN",
            FlightPhase::Coast => "COAST",
            FlightPhase::Descent => "CHUTE",
            FlightPhase::Landed => "LANDED",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Rigid-body state
// ---------------------------------------------------------------------------

/// Kinematic state of the rocket at a single point in time.
/// Frame: x downrange along the field, y up, origin at the field's left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct RocketState {
    pub time: f64,            // s since ignition
    pub pos: Vector2<f64>,    // m
    pub vel: Vector2<f64>,    // m/s
    pub mass: f64,            // kg (decreases during burn)
    pub dry_mass: f64,        // kg
    pub parachute_deployed: bool,
    pub phase: FlightPhase,
}

impl RocketState {
    /// Fully fuelled rocket resting on the pad at `launch`.
    pub fn on_pad(launch: Vector2<f64>, airframe: &Airframe) -> Self {
        Self {
            time: 0.0,
            pos: launch,
            vel: Vector2::zeros(),
            mass: airframe.total_mass(),
            dry_mass: airframe.dry_mass,
            parachute_deployed: false,
            phase: FlightPhase::Ascent,
        }
    }

    pub fn altitude(&self) -> f64 {
        self.pos.y
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Replace a non-positive mass with the dry mass.
    /// Returns `true` if the floor had to be applied.
    pub fn enforce_mass_floor(&mut self) -> bool {
        if self.mass <= 0.0 || self.mass.is_nan() {
            self.mass = self.dry_mass;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Flight trace
// ---------------------------------------------------------------------------

/// One recorded integration sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
}

impl Sample {
    pub fn of(state: &RocketState) -> Self {
        Self {
            time: state.time,
            pos: state.pos,
            vel: state.vel,
        }
    }
}

/// Append-only time series of a single flight.
///
/// Only the integrator appends; everyone else gets a read-only slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightTrace {
    samples: Vec<Sample>,
}

impl FlightTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn record(&mut self, state: &RocketState) {
        self.samples.push(Sample::of(state));
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Highest sample, found by scanning the whole trace.
    /// Ties resolve to the earliest sample.
    pub fn highest(&self) -> Option<&Sample> {
        self.samples
            .iter()
            .fold(None, |best: Option<&Sample>, s| match best {
                Some(b) if b.pos.y >= s.pos.y => Some(b),
                _ => Some(s),
            })
    }

    /// Peak speed over the whole trace.
    pub fn max_speed(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.vel.norm())
            .fold(0.0_f64, f64::max)
    }
}

impl<'a> IntoIterator for &'a FlightTrace {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
