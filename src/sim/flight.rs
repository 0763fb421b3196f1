use log::{debug, info, warn};
use nalgebra::Vector2;

use crate::config::{DeployPolicy, SimConfig};
use crate::dynamics::state::{FlightPhase, FlightTrace, RocketState};
use crate::physics::wind_vector;
use crate::vehicle::{Airframe, EngineProfile};
use super::event::{ApogeeDetector, BurnoutDetector, EventDetector, EventKind, FlightEvent};
use super::integrator::{euler_step, ForceContext};
use super::landing::{FieldGeometry, LandingOutcome};

// ---------------------------------------------------------------------------
// Step signals
// ---------------------------------------------------------------------------

/// Where and when the rocket came to rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub outcome: LandingOutcome,
    pub position: Vector2<f64>,
    pub time: f64,
}

/// Result of one tick. `landing` is only set on the tick that lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSignal {
    pub phase: FlightPhase,
    pub landing: Option<Landing>,
}

// ---------------------------------------------------------------------------
// Flight handle
// ---------------------------------------------------------------------------

/// One flight attempt: owns the rocket state and its trace.
///
/// Drive it with [`Flight::step`], either in a tight loop or once per host
/// frame. Stopping early needs no cleanup.
pub struct Flight {
    engine: EngineProfile,
    airframe: Airframe,
    config: SimConfig,
    wind_speed: f64,
    wind_direction: f64,
    wind: Vector2<f64>,
    state: RocketState,
    trace: FlightTrace,
    events: Vec<FlightEvent>,
    detectors: Vec<Box<dyn EventDetector>>,
    max_altitude: f64,
    apogee_time: f64,
    landing: Option<Landing>,
    timed_out: bool,
}

impl Flight {
    pub(crate) fn new(
        engine: EngineProfile,
        airframe: Airframe,
        config: SimConfig,
        wind_speed: f64,
        wind_direction: f64,
    ) -> Self {
        let state = RocketState::on_pad(config.field.launch_point(), &airframe);

        let capacity = config.step_budget().saturating_add(1);
        let mut trace = FlightTrace::with_capacity(capacity.min(100_000));
        trace.record(&state);

        info!(
            "Flight start: {} on {}, wind {:.1} m/s @ {:.0} deg, {:?} deploy",
            engine.name, airframe.name, wind_speed, wind_direction, config.deploy_policy
        );

        Self {
            wind: wind_vector(wind_speed, wind_direction),
            max_altitude: state.pos.y,
            apogee_time: state.time,
            engine,
            airframe,
            config,
            wind_speed,
            wind_direction,
            state,
            trace,
            events: Vec::new(),
            detectors: vec![Box::new(BurnoutDetector), Box::new(ApogeeDetector::default())],
            landing: None,
            timed_out: false,
        }
    }

    pub fn state(&self) -> &RocketState {
        &self.state
    }

    pub fn phase(&self) -> FlightPhase {
        self.state.phase
    }

    pub fn trace(&self) -> &FlightTrace {
        &self.trace
    }

    pub fn events(&self) -> &[FlightEvent] {
        &self.events
    }

    pub fn engine(&self) -> &EngineProfile {
        &self.engine
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn wind(&self) -> Vector2<f64> {
        self.wind
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    pub fn wind_direction(&self) -> f64 {
        self.wind_direction
    }

    pub fn max_altitude(&self) -> f64 {
        self.max_altitude
    }

    pub fn apogee_time(&self) -> f64 {
        self.apogee_time
    }

    pub fn landing(&self) -> Option<&Landing> {
        self.landing.as_ref()
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Landed, or cut short by the safety bound.
    pub fn is_finished(&self) -> bool {
        self.landing.is_some() || self.timed_out
    }

    /// Host request to pop the parachute.
    ///
    /// Honoured only under [`DeployPolicy::Manual`], after burnout, before
    /// landing and only once. Anything else is ignored and returns `false`.
    pub fn request_parachute_deploy(&mut self) -> bool {
        if self.config.deploy_policy != DeployPolicy::Manual {
            debug!("deploy request ignored: automatic deploy policy");
            return false;
        }
        if self.is_finished() || self.state.parachute_deployed {
            return false;
        }
        if self.state.phase != FlightPhase::Coast {
            debug!("deploy request ignored at t={:.3}s: motor still burning", self.state.time);
            return false;
        }
        self.deploy();
        true
    }

    /// Advance the flight by one tick of `dt` seconds.
    ///
    /// A finished flight, or a non-positive `dt`, leaves the state untouched.
    pub fn step(&mut self, dt: f64) -> PhaseSignal {
        if self.is_finished() || !(dt > 0.0) {
            return self.signal(None);
        }
        if self.state.time >= self.config.max_time {
            self.expire();
            return self.signal(None);
        }

        if self.config.deploy_policy == DeployPolicy::Automatic && self.ejection_due() {
            self.deploy();
        }
        if self.state.enforce_mass_floor() {
            warn!("non-positive mass at t={:.3}s, clamped to dry mass", self.state.time);
        }

        let ctx = ForceContext {
            engine: &self.engine,
            airframe: &self.airframe,
            config: &self.config,
            wind: self.wind,
        };
        let mut next = euler_step(&self.state, &ctx, dt);

        if next.phase == FlightPhase::Ascent && next.time > self.engine.burn_time {
            next.phase = FlightPhase::Coast;
        }
        let landing = self.touch_down(&mut next);

        self.trace.record(&next);
        if next.altitude() > self.max_altitude {
            self.max_altitude = next.altitude();
            self.apogee_time = next.time;
        }
        for detector in &mut self.detectors {
            if let Some(kind) = detector.check(&self.state, &next) {
                debug!(
                    "{:?} at t={:.2}s, alt={:.1}m, speed={:.1}m/s",
                    kind,
                    next.time,
                    next.altitude(),
                    next.speed()
                );
                self.events.push(FlightEvent::at(&next, kind));
            }
        }
        self.state = next;

        if let Some(landing) = landing {
            info!(
                "Landed in {} at x={:.1}m after {:.2}s (apogee {:.1}m)",
                landing.outcome, landing.position.x, landing.time, self.max_altitude
            );
            self.events
                .push(FlightEvent::at(&self.state, EventKind::Landing(landing.outcome)));
            self.landing = Some(landing);
        }

        self.signal(landing)
    }

    /// Stop the flight at the safety bound.
    pub(crate) fn expire(&mut self) {
        if self.is_finished() {
            return;
        }
        warn!(
            "Flight cut short at t={:.2}s (limit {:.0}s), alt={:.1}m",
            self.state.time,
            self.config.max_time,
            self.state.altitude()
        );
        self.timed_out = true;
        self.events.push(FlightEvent::at(&self.state, EventKind::TimeLimit));
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Ejection charge: delay elapsed and no longer climbing.
    fn ejection_due(&self) -> bool {
        !self.state.parachute_deployed
            && self.state.phase == FlightPhase::Coast
            && self.state.time > self.engine.deploy_window_opens()
            && self.state.vel.y <= 0.0
    }

    fn deploy(&mut self) {
        self.state.parachute_deployed = true;
        self.state.phase = FlightPhase::Descent;
        info!(
            "Parachute deployed at t={:.2}s, alt={:.1}m, speed={:.1}m/s",
            self.state.time,
            self.state.altitude(),
            self.state.speed()
        );
        self.events
            .push(FlightEvent::at(&self.state, EventKind::ParachuteDeployed));
    }

    /// Classify the zone under the rocket and, if it has sunk to that zone's
    /// terminal altitude while descending, pin it there.
    ///
    /// Runs every tick: a drifting rocket can cross the field edge during
    /// descent, which changes the altitude it lands at.
    fn touch_down(&self, next: &mut RocketState) -> Option<Landing> {
        let outcome = self.config.field.classify(next.pos.x);
        let floor = self.config.field.terminal_altitude(outcome);
        if next.vel.y > 0.0 || next.pos.y > floor {
            return None;
        }

        next.pos.y = floor;
        next.vel = Vector2::zeros();
        next.phase = FlightPhase::Landed;
        Some(Landing {
            outcome,
            position: next.pos,
            time: next.time,
        })
    }

    fn signal(&self, landing: Option<Landing>) -> PhaseSignal {
        PhaseSignal {
            phase: self.state.phase,
            landing,
        }
    }

    pub(crate) fn into_parts(self) -> FlightParts {
        FlightParts {
            engine: self.engine,
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction,
            state: self.state,
            trace: self.trace,
            events: self.events,
            max_altitude: self.max_altitude,
            apogee_time: self.apogee_time,
            landing: self.landing,
            field: self.config.field,
        }
    }
}

/// Owned pieces of a finished flight, consumed by the runner's report.
pub(crate) struct FlightParts {
    pub engine: EngineProfile,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub state: RocketState,
    pub trace: FlightTrace,
    pub events: Vec<FlightEvent>,
    pub max_altitude: f64,
    pub apogee_time: f64,
    pub landing: Option<Landing>,
    pub field: FieldGeometry,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c6_5() -> EngineProfile {
        EngineProfile::new("C6-5", 10.0, 6.0, 1.667, 5.0)
    }

    fn flight(config: SimConfig, wind_speed: f64) -> Flight {
        Flight::new(c6_5(), Airframe::default(), config, wind_speed, 0.0)
    }

    fn fly_out(f: &mut Flight) -> Vec<PhaseSignal> {
        let dt = f.config().dt;
        let mut signals = Vec::new();
        while !f.is_finished() {
            signals.push(f.step(dt));
        }
        signals
    }

    #[test]
    fn starts_on_pad_at_field_center() {
        let f = flight(SimConfig::default(), 0.0);
        assert_eq!(f.phase(), FlightPhase::Ascent);
        assert_eq!(f.state().pos, Vector2::new(54.85, 0.0));
        assert_eq!(f.trace().len(), 1);
        assert!(!f.is_finished());
    }

    #[test]
    fn phases_progress_in_order() {
        let mut f = flight(SimConfig::default(), 0.0);
        let signals = fly_out(&mut f);

        let mut phases: Vec<FlightPhase> = signals.iter().map(|s| s.phase).collect();
        phases.dedup();
        assert_eq!(
            phases,
            vec![
                FlightPhase::Ascent,
                FlightPhase::Coast,
                FlightPhase::Descent,
                FlightPhase::Landed
            ]
        );
    }

    #[test]
    fn landing_reported_exactly_once() {
        let mut f = flight(SimConfig::default(), 0.0);
        let signals = fly_out(&mut f);
        let landings: Vec<&Landing> = signals.iter().filter_map(|s| s.landing.as_ref()).collect();
        assert_eq!(landings.len(), 1);
        assert_eq!(signals.last().unwrap().landing.as_ref(), Some(landings[0]));

        // Further ticks are inert.
        let before = f.trace().len();
        let s = f.step(0.01);
        assert_eq!(s.phase, FlightPhase::Landed);
        assert!(s.landing.is_none());
        assert_eq!(f.trace().len(), before);
    }

    #[test]
    fn landing_zeroes_velocity() {
        let mut f = flight(SimConfig::default(), 0.0);
        fly_out(&mut f);
        assert_eq!(f.state().vel, Vector2::zeros());
        assert_eq!(f.state().pos.y, 0.0);
        assert_eq!(f.landing().unwrap().outcome, LandingOutcome::Field);
    }

    /// Flight already under canopy at `pos` with velocity `vel`.
    fn descending_at(pos: Vector2<f64>, vel: Vector2<f64>) -> Flight {
        let mut f = flight(SimConfig::default(), 0.0);
        f.state.time = 20.0;
        f.state.pos = pos;
        f.state.vel = vel;
        f.state.mass = f.state.dry_mass;
        f.state.parachute_deployed = true;
        f.state.phase = FlightPhase::Descent;
        f
    }

    #[test]
    fn drifting_over_field_edge_below_canopy_lands_in_trees() {
        let field = FieldGeometry::default();
        let mut f = descending_at(Vector2::new(109.69, 3.0), Vector2::new(5.0, -1.0));

        let signal = f.step(0.01);
        let landing = signal.landing.expect("crossing the edge below the canopy lands");
        assert_eq!(signal.phase, FlightPhase::Landed);
        assert_eq!(landing.outcome, LandingOutcome::Trees);
        assert_eq!(landing.position.y, field.tree_height);
        assert!(landing.position.x > field.length);
        assert_eq!(f.state().vel, Vector2::zeros());
    }

    #[test]
    fn inside_field_below_canopy_falls_to_ground() {
        let mut f = descending_at(Vector2::new(50.0, 3.0), Vector2::new(0.0, -1.0));

        let landing = loop {
            let signal = f.step(0.01);
            if let Some(landing) = signal.landing {
                break landing;
            }
            assert!(f.state().pos.y > 0.0);
            assert_eq!(signal.phase, FlightPhase::Descent);
        };
        assert_eq!(landing.outcome, LandingOutcome::Field);
        assert_eq!(landing.position.y, 0.0);
    }

    #[test]
    fn automatic_policy_ignores_host_requests() {
        let mut f = flight(SimConfig::default(), 0.0);
        for _ in 0..300 {
            f.step(0.01);
        }
        assert_eq!(f.phase(), FlightPhase::Coast);
        assert!(!f.request_parachute_deploy());
        assert!(!f.state().parachute_deployed);
    }

    #[test]
    fn automatic_deploy_waits_for_delay() {
        let mut f = flight(SimConfig::default(), 0.0);
        fly_out(&mut f);
        let deploy = f
            .events()
            .iter()
            .find(|e| e.kind == EventKind::ParachuteDeployed)
            .expect("parachute should deploy");
        assert!(deploy.time > 1.667 + 5.0);
    }

    #[test]
    fn manual_request_rejected_during_burn() {
        let mut f = flight(SimConfig::interactive(), 0.0);
        f.step(0.033);
        assert_eq!(f.phase(), FlightPhase::Ascent);
        assert!(!f.request_parachute_deploy());
        assert!(!f.state().parachute_deployed);
    }

    #[test]
    fn manual_request_accepted_after_burnout() {
        let mut f = flight(SimConfig::interactive(), 0.0);
        while f.state().time <= 2.0 {
            f.step(0.033);
        }
        assert_eq!(f.phase(), FlightPhase::Coast);
        assert!(f.request_parachute_deploy());
        assert_eq!(f.phase(), FlightPhase::Descent);
        assert!(!f.request_parachute_deploy(), "second request is a no-op");
    }

    #[test]
    fn manual_policy_without_request_never_deploys() {
        let mut f = flight(SimConfig::interactive(), 0.0);
        fly_out(&mut f);
        assert!(!f.state().parachute_deployed);
        assert!(f
            .events()
            .iter()
            .all(|e| e.kind != EventKind::ParachuteDeployed));
        assert!(f.landing().is_some());
    }

    #[test]
    fn safety_bound_stops_the_flight() {
        let config = SimConfig {
            max_time: 2.0,
            ..SimConfig::default()
        };
        let mut f = flight(config, 0.0);
        let mut ticks = 0;
        while !f.is_finished() {
            f.step(0.01);
            ticks += 1;
            assert!(ticks < 1_000, "flight must stop at the safety bound");
        }
        assert!(f.timed_out());
        assert!(f.landing().is_none());
        assert_eq!(f.events().last().unwrap().kind, EventKind::TimeLimit);
    }

    #[test]
    fn non_positive_dt_is_ignored() {
        let mut f = flight(SimConfig::default(), 0.0);
        let s = f.step(0.0);
        assert_eq!(s.phase, FlightPhase::Ascent);
        assert_eq!(f.trace().len(), 1);
        f.step(-1.0);
        assert_eq!(f.state().time, 0.0);
    }

    #[test]
    fn zero_mass_is_clamped_before_integrating() {
        let mut f = flight(SimConfig::default(), 0.0);
        f.state.mass = 0.0;
        f.step(0.01);
        assert!(f.state().mass >= f.state().dry_mass);
        assert!(f.state().pos.y.is_finite());
    }

    #[test]
    fn events_are_time_ordered() {
        let mut f = flight(SimConfig::default(), 3.0);
        fly_out(&mut f);
        let kinds: Vec<EventKind> = f.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds[0], EventKind::Burnout);
        assert!(kinds.contains(&EventKind::Apogee));
        assert!(matches!(kinds.last(), Some(EventKind::Landing(_))));
        assert!(f.events().windows(2).all(|w| w[0].time <= w[1].time));
    }
}
