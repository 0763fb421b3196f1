use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::SimError;
use crate::sim::batch::BatchSummary;
use crate::sim::event::EventKind;
use crate::sim::landing::LandingOutcome;
use crate::sim::runner::{FlightReport, Termination};

/// Post-flight summary, as shown on the results screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub flight: FlightInfo,
    pub performance: Performance,
    pub landing: LandingInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightInfo {
    pub engine: String,
    pub wind_speed_ms: f64,
    pub wind_direction_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Performance {
    pub apogee_m: f64,
    pub apogee_ft: f64,
    pub apogee_time_s: f64,
    pub max_speed_ms: f64,
    pub burnout_time_s: Option<f64>,
    pub deploy_time_s: Option<f64>,
    pub flight_time_s: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandingInfo {
    pub outcome: LandingOutcome,
    pub x_m: f64,
    pub y_m: f64,
    pub drift_m: f64,
    pub termination: Termination,
}

const FEET_PER_METER: f64 = 3.28084;

impl FlightSummary {
    pub fn from_report(report: &FlightReport) -> Self {
        let event_time = |kind: EventKind| {
            report
                .events
                .iter()
                .find(|e| e.kind == kind)
                .map(|e| e.time)
        };
        let launch_x = report.trace.first().map_or(report.landing_position.x, |s| s.pos.x);

        FlightSummary {
            flight: FlightInfo {
                engine: report.engine.name.clone(),
                wind_speed_ms: report.wind_speed,
                wind_direction_deg: report.wind_direction,
            },
            performance: Performance {
                apogee_m: report.max_altitude,
                apogee_ft: report.max_altitude * FEET_PER_METER,
                apogee_time_s: report.apogee_time,
                max_speed_ms: report.trace.max_speed(),
                burnout_time_s: event_time(EventKind::Burnout),
                deploy_time_s: event_time(EventKind::ParachuteDeployed),
                flight_time_s: report.flight_time,
            },
            landing: LandingInfo {
                outcome: report.outcome,
                x_m: report.landing_position.x,
                y_m: report.landing_position.y,
                drift_m: report.landing_position.x - launch_x,
                termination: report.termination,
            },
        }
    }
}

/// Write flight summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &FlightSummary) -> Result<(), SimError> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// Write flight summary JSON to a file.
pub fn write_summary_file<P: AsRef<Path>>(path: P, summary: &FlightSummary) -> Result<(), SimError> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

/// Write batch statistics as pretty JSON to a writer.
pub fn write_batch<W: Write>(writer: &mut W, batch: &BatchSummary) -> Result<(), SimError> {
    serde_json::to_writer_pretty(&mut *writer, batch)?;
    writeln!(writer)?;
    Ok(())
}
