use log::info;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::error::SimError;
use super::landing::LandingOutcome;
use super::runner::{Simulator, Termination};

/// Range of wind speeds drawn for a batch, m/s. Directions are uniform
/// over the full circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindRange {
    pub min_speed: f64,
    pub max_speed: f64,
}

impl Default for WindRange {
    fn default() -> Self {
        Self {
            min_speed: 0.0,
            max_speed: 8.0,
        }
    }
}

/// Outcome statistics over many flights of one engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub engine: String,
    pub runs: usize,
    pub field: usize,
    pub trees: usize,
    pub timed_out: usize,
    pub mean_altitude: f64,
    pub max_altitude: f64,
}

impl BatchSummary {
    pub fn field_fraction(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.field as f64 / self.runs as f64
        }
    }
}

/// Fly `runs` flights under random wind drawn from `wind` with a seeded RNG.
///
/// Same simulator, engine, range and seed give the same summary.
pub fn run_batch(
    sim: &Simulator<'_>,
    engine_key: &str,
    runs: usize,
    wind: WindRange,
    seed: u64,
) -> Result<BatchSummary, SimError> {
    if !(wind.min_speed >= 0.0) || !(wind.max_speed >= wind.min_speed) {
        return Err(SimError::InvalidConfig(format!(
            "wind range {:?}..{:?} m/s is empty or negative",
            wind.min_speed, wind.max_speed
        )));
    }
    let engine = sim.catalog().get(engine_key)?.name.clone();

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut summary = BatchSummary {
        engine,
        runs,
        field: 0,
        trees: 0,
        timed_out: 0,
        mean_altitude: 0.0,
        max_altitude: 0.0,
    };
    let mut altitude_sum = 0.0;

    for _ in 0..runs {
        let speed = rng.random_range(wind.min_speed..=wind.max_speed);
        let direction = rng.random_range(0.0..360.0);
        let report = sim.run_to_completion(engine_key, speed, direction)?;

        match report.outcome {
            LandingOutcome::Field => summary.field += 1,
            LandingOutcome::Trees => summary.trees += 1,
        }
        if report.termination == Termination::TimeLimit {
            summary.timed_out += 1;
        }
        altitude_sum += report.max_altitude;
        summary.max_altitude = summary.max_altitude.max(report.max_altitude);
    }

    if runs > 0 {
        summary.mean_altitude = altitude_sum / runs as f64;
    }
    info!(
        "Batch {} x{}: {} field / {} trees, mean apogee {:.1}m",
        summary.engine, runs, summary.field, summary.trees, summary.mean_altitude
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::EngineCatalog;

    #[test]
    fn counts_cover_every_run() {
        let catalog = EngineCatalog::standard();
        let sim = Simulator::with_defaults(&catalog);
        let s = run_batch(&sim, "A", 12, WindRange::default(), 7).unwrap();
        assert_eq!(s.runs, 12);
        assert_eq!(s.field + s.trees, 12);
        assert_eq!(s.timed_out, 0);
        assert!(s.max_altitude >= s.mean_altitude);
        assert!(s.mean_altitude > 0.0);
    }

    #[test]
    fn same_seed_same_summary() {
        let catalog = EngineCatalog::standard();
        let sim = Simulator::with_defaults(&catalog);
        let a = run_batch(&sim, "B", 8, WindRange::default(), 42).unwrap();
        let b = run_batch(&sim, "B", 8, WindRange::default(), 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn calm_air_always_lands_on_the_field() {
        let catalog = EngineCatalog::standard();
        let sim = Simulator::with_defaults(&catalog);
        let calm = WindRange { min_speed: 0.0, max_speed: 0.0 };
        let s = run_batch(&sim, "C", 5, calm, 1).unwrap();
        assert_eq!(s.field, 5);
        assert_eq!(s.field_fraction(), 1.0);
    }

    #[test]
    fn rejects_inverted_range_and_unknown_engine() {
        let catalog = EngineCatalog::standard();
        let sim = Simulator::with_defaults(&catalog);
        let inverted = WindRange { min_speed: 5.0, max_speed: 1.0 };
        assert!(matches!(
            run_batch(&sim, "A", 3, inverted, 0),
            Err(SimError::InvalidConfig(_))
        ));
        assert!(matches!(
            run_batch(&sim, "X", 3, WindRange::default(), 0),
            Err(SimError::UnknownEngine(_))
        ));
    }

    #[test]
    fn zero_runs_is_an_empty_summary() {
        let catalog = EngineCatalog::standard();
        let sim = Simulator::with_defaults(&catalog);
        let s = run_batch(&sim, "A", 0, WindRange::default(), 0).unwrap();
        assert_eq!(s.runs, 0);
        assert_eq!(s.mean_altitude, 0.0);
        assert_eq!(s.field_fraction(), 0.0);
    }
}
