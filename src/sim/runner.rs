use nalgebra::Vector2;
use serde::Serialize;

use crate::config::{DeployPolicy, SimConfig};
use crate::dynamics::state::FlightTrace;
use crate::error::SimError;
use crate::vehicle::{Airframe, EngineCatalog, EngineProfile};
use super::control::{DeployController, NeverDeploy};
use super::event::FlightEvent;
use super::flight::Flight;
use super::landing::LandingOutcome;

// ---------------------------------------------------------------------------
// Flight report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Landed,
    TimeLimit,
}

/// Everything a finished flight produced.
#[derive(Debug, Clone)]
pub struct FlightReport {
    pub engine: EngineProfile,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub max_altitude: f64,
    pub apogee_time: f64,
    pub outcome: LandingOutcome,
    pub landing_position: Vector2<f64>,
    pub flight_time: f64,
    pub termination: Termination,
    pub trace: FlightTrace,
    pub events: Vec<FlightEvent>,
}

impl Flight {
    /// Close out the flight. A flight stopped before touchdown is classified
    /// by where it was when it stopped.
    pub fn finish(self) -> FlightReport {
        let parts = self.into_parts();
        let (outcome, landing_position, termination) = match parts.landing {
            Some(landing) => (landing.outcome, landing.position, Termination::Landed),
            None => (
                parts.field.classify(parts.state.pos.x),
                parts.state.pos,
                Termination::TimeLimit,
            ),
        };

        FlightReport {
            engine: parts.engine,
            wind_speed: parts.wind_speed,
            wind_direction: parts.wind_direction,
            max_altitude: parts.max_altitude,
            apogee_time: parts.apogee_time,
            outcome,
            landing_position,
            flight_time: parts.state.time,
            termination,
            trace: parts.trace,
            events: parts.events,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Entry point for hosts: starts flights against an injected engine catalog.
pub struct Simulator<'a> {
    catalog: &'a EngineCatalog,
    airframe: Airframe,
    config: SimConfig,
}

impl<'a> Simulator<'a> {
    pub fn new(
        catalog: &'a EngineCatalog,
        airframe: Airframe,
        config: SimConfig,
    ) -> Result<Self, SimError> {
        config.validate()?;
        airframe.validate()?;
        Ok(Self {
            catalog,
            airframe,
            config,
        })
    }

    /// Alpha III airframe with the batch-mode defaults.
    pub fn with_defaults(catalog: &'a EngineCatalog) -> Self {
        Self {
            catalog,
            airframe: Airframe::default(),
            config: SimConfig::default(),
        }
    }

    pub fn catalog(&self) -> &EngineCatalog {
        self.catalog
    }

    pub fn airframe(&self) -> &Airframe {
        &self.airframe
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Fresh flight on the pad. Fails fast on an unknown engine key.
    pub fn start_flight(
        &self,
        engine_key: &str,
        wind_speed: f64,
        wind_direction_deg: f64,
    ) -> Result<Flight, SimError> {
        let engine = self.catalog.get(engine_key)?.clone();
        Ok(Flight::new(
            engine,
            self.airframe.clone(),
            self.config.clone(),
            wind_speed,
            wind_direction_deg,
        ))
    }

    /// Fly from ignition to touchdown (or the safety bound) with no host
    /// input.
    pub fn run_to_completion(
        &self,
        engine_key: &str,
        wind_speed: f64,
        wind_direction_deg: f64,
    ) -> Result<FlightReport, SimError> {
        self.run_with(engine_key, wind_speed, wind_direction_deg, &mut NeverDeploy)
    }

    /// Fly to completion, polling `controller` for deploy requests each tick.
    /// The controller only matters under [`DeployPolicy::Manual`].
    pub fn run_with(
        &self,
        engine_key: &str,
        wind_speed: f64,
        wind_direction_deg: f64,
        controller: &mut dyn DeployController,
    ) -> Result<FlightReport, SimError> {
        let mut flight = self.start_flight(engine_key, wind_speed, wind_direction_deg)?;
        let dt = self.config.dt;
        let manual = self.config.deploy_policy == DeployPolicy::Manual;

        // Hard step budget on top of the time check inside `step`.
        for _ in 0..self.config.step_budget() {
            if flight.is_finished() {
                break;
            }
            if manual
                && !flight.state().parachute_deployed
                && controller.wants_deploy(flight.state())
                && flight.request_parachute_deploy()
            {
                log::debug!("{} controller deployed at t={:.2}s", controller.name(), flight.state().time);
            }
            flight.step(dt);
        }
        flight.expire();

        Ok(flight.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::FlightPhase;
    use crate::sim::control::{DeployAt, DeployAtApogee};

    #[test]
    fn unknown_engine_fails_at_start() {
        let catalog = EngineCatalog::standard();
        let sim = Simulator::with_defaults(&catalog);
        assert!(matches!(
            sim.start_flight("Q", 0.0, 0.0),
            Err(SimError::UnknownEngine(_))
        ));
        assert!(matches!(
            sim.run_to_completion("Q", 0.0, 0.0),
            Err(SimError::UnknownEngine(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let catalog = EngineCatalog::standard();
        let config = SimConfig {
            dt: -0.01,
            ..SimConfig::default()
        };
        assert!(Simulator::new(&catalog, Airframe::default(), config).is_err());
    }

    #[test]
    fn unbounded_config_is_rejected_before_flight() {
        let catalog = EngineCatalog::standard();
        for config in [
            SimConfig {
                max_time: f64::INFINITY,
                ..SimConfig::default()
            },
            SimConfig {
                dt: 1e-320,
                ..SimConfig::default()
            },
        ] {
            assert!(matches!(
                Simulator::new(&catalog, Airframe::default(), config),
                Err(SimError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn rocket_comes_back_down() {
        let catalog = EngineCatalog::standard();
        let sim = Simulator::with_defaults(&catalog);
        let report = sim.run_to_completion("A", 0.0, 0.0).unwrap();
        assert_eq!(report.termination, Termination::Landed);
        assert_eq!(report.outcome, LandingOutcome::Field);
        assert!(report.flight_time > report.engine.burn_time);
        assert_eq!(report.trace.last().unwrap().pos, report.landing_position);
    }

    #[test]
    fn higher_impulse_flies_higher() {
        let catalog = EngineCatalog::standard();
        let sim = Simulator::with_defaults(&catalog);
        let a = sim.run_to_completion("A", 0.0, 0.0).unwrap().max_altitude;
        let b = sim.run_to_completion("B", 0.0, 0.0).unwrap().max_altitude;
        let c = sim.run_to_completion("C", 0.0, 0.0).unwrap().max_altitude;
        assert!(a < b && b < c, "A={:.0} B={:.0} C={:.0}", a, b, c);
    }

    #[test]
    fn timed_controller_deploys_under_manual_policy() {
        let catalog = EngineCatalog::standard();
        let sim = Simulator::new(&catalog, Airframe::default(), SimConfig::interactive()).unwrap();
        let report = sim
            .run_with("C", 0.0, 0.0, &mut DeployAt { time: 4.0 })
            .unwrap();
        let deployed = report
            .events
            .iter()
            .find(|e| e.kind == crate::sim::event::EventKind::ParachuteDeployed)
            .expect("controller should deploy");
        assert!(deployed.time >= 4.0 && deployed.time < 4.1);
    }

    #[test]
    fn apogee_controller_deploys_just_past_the_peak() {
        let catalog = EngineCatalog::standard();
        let sim = Simulator::new(&catalog, Airframe::default(), SimConfig::interactive()).unwrap();
        let dt = sim.config().dt;
        let report = sim.run_with("B", 0.0, 0.0, &mut DeployAtApogee).unwrap();

        let deployed = report
            .events
            .iter()
            .find(|e| e.kind == crate::sim::event::EventKind::ParachuteDeployed)
            .expect("controller should deploy");
        assert!(deployed.time > report.apogee_time);
        assert!(deployed.time <= report.apogee_time + 2.0 * dt + 1e-9);
        assert_eq!(report.termination, Termination::Landed);
    }

    #[test]
    fn time_limit_report_is_classified() {
        let catalog = EngineCatalog::standard();
        let config = SimConfig {
            max_time: 1.0,
            ..SimConfig::default()
        };
        let sim = Simulator::new(&catalog, Airframe::default(), config).unwrap();
        let mut flight = sim.start_flight("C", 0.0, 0.0).unwrap();
        while !flight.is_finished() {
            flight.step(0.01);
        }
        assert_eq!(flight.phase(), FlightPhase::Ascent);
        let report = flight.finish();
        assert_eq!(report.termination, Termination::TimeLimit);
        assert_eq!(report.outcome, LandingOutcome::Field);
        assert!(report.landing_position.y > 0.0);
    }
}
