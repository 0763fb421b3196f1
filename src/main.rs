use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::*;

use hobby_rocket_sim::batch::{run_batch, WindRange};
use hobby_rocket_sim::export::{write_batch, write_summary_file, write_trace_file, FlightSummary};
use hobby_rocket_sim::sim::{DeployAt, DeployAtApogee, DeployController, EventKind, NeverDeploy};
use hobby_rocket_sim::{DeployPolicy, FlightReport, Settings, Simulator};

#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// TOML settings file with [sim], [airframe] and [engines.<KEY>] tables
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum CliCommand {
    /// Fly one rocket and print the flight report
    Fly {
        #[clap(short, long, default_value = "C")]
        engine: String,
        #[clap(long, default_value_t = 0.0)]
        wind_speed: f64,
        #[clap(long, default_value_t = 0.0, help = "Degrees, 0 blows toward +x")]
        wind_direction: f64,
        #[clap(long, help = "Deploy manually: request the parachute at T seconds")]
        manual_deploy_at: Option<f64>,
        #[clap(
            long,
            conflicts_with = "manual_deploy_at",
            help = "Deploy manually: request the parachute once the rocket stops climbing"
        )]
        deploy_at_apogee: bool,
        #[clap(long, help = "Write the trajectory trace as CSV")]
        csv: Option<PathBuf>,
        #[clap(long, help = "Write the flight summary as JSON")]
        json: Option<PathBuf>,
    },
    /// Fly many rockets under random wind and report landing statistics
    Batch {
        #[clap(short, long, default_value = "B")]
        engine: String,
        #[clap(short, long, default_value_t = 50)]
        runs: usize,
        #[clap(long, default_value_t = 8.0)]
        max_wind: f64,
        #[clap(long, default_value_t = 0)]
        seed: u64,
        #[clap(long, help = "Print the statistics as JSON instead of a table")]
        json: bool,
    },
    /// List the available engines
    Engines,
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Settings::from_toml_file(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}

/// Who pops the parachute on a `fly` run.
fn deploy_controller(
    manual_deploy_at: Option<f64>,
    at_apogee: bool,
) -> Option<Box<dyn DeployController>> {
    match (manual_deploy_at, at_apogee) {
        (Some(time), _) => Some(Box::new(DeployAt { time })),
        (None, true) => Some(Box::new(DeployAtApogee)),
        (None, false) => None,
    }
}

#[allow(clippy::too_many_arguments)]
fn fly(
    settings: Settings,
    engine: &str,
    wind_speed: f64,
    wind_direction: f64,
    manual_deploy_at: Option<f64>,
    deploy_at_apogee: bool,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
) -> anyhow::Result<()> {
    let catalog = settings.catalog()?;
    let mut controller = deploy_controller(manual_deploy_at, deploy_at_apogee);
    let config = match controller {
        Some(_) => settings.sim.clone().with_deploy_policy(DeployPolicy::Manual),
        None => settings.sim.clone(),
    };
    let sim = Simulator::new(&catalog, settings.airframe.clone(), config)?;

    let report = match controller.as_deref_mut() {
        Some(controller) => {
            info!("Manual deploy by the {} controller", controller.name());
            sim.run_with(engine, wind_speed, wind_direction, controller)?
        }
        None => sim.run_with(engine, wind_speed, wind_direction, &mut NeverDeploy)?,
    };

    print_report(&sim, &report);

    if let Some(path) = csv {
        write_trace_file(&path, &report.trace)?;
        info!("Trace written to {}", path.display());
    }
    if let Some(path) = json {
        write_summary_file(&path, &FlightSummary::from_report(&report))?;
        info!("Summary written to {}", path.display());
    }
    Ok(())
}

fn print_report(sim: &Simulator<'_>, report: &FlightReport) {
    let airframe = sim.airframe();
    let engine = &report.engine;
    let config = sim.config();

    println!();
    println!("====================================================================");
    println!("  MODEL ROCKET FLIGHT: {} on {}", airframe.name, engine.name);
    println!("====================================================================");
    println!();
    println!("  Vehicle");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Dry mass:      {:>8.1} g     Propellant:   {:>8.1} g",
        airframe.dry_mass * 1000.0,
        airframe.propellant_mass * 1000.0
    );
    println!(
        "  Thrust:        {:>8.1} N     Impulse:      {:>8.2} N·s",
        engine.average_thrust, engine.total_impulse
    );
    println!(
        "  Burn time:     {:>8.3} s     Delay:        {:>8.1} s",
        engine.burn_time, engine.igniter_delay
    );
    println!(
        "  Wind:          {:>8.1} m/s   Direction:    {:>8.0} deg",
        report.wind_speed, report.wind_direction
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for event in &report.events {
        let label = match event.kind {
            EventKind::Burnout => "BURNOUT".to_string(),
            EventKind::Apogee => "APOGEE".to_string(),
            EventKind::ParachuteDeployed => "CHUTE".to_string(),
            EventKind::Landing(outcome) => format!("LANDED ({})", outcome),
            EventKind::TimeLimit => "TIMEOUT".to_string(),
        };
        println!(
            "  {:<16} t={:>6.2}s   x={:>7.1}m   alt={:>7.1}m",
            label, event.time, event.pos.x, event.pos.y
        );
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Max altitude:  {:>8.1} m   ({:.0} ft) at t={:.2}s",
        report.max_altitude,
        report.max_altitude * 3.28084,
        report.apogee_time
    );
    println!("  Max speed:     {:>8.1} m/s", report.trace.max_speed());
    println!("  Flight time:   {:>8.1} s", report.flight_time);
    println!(
        "  Landing:       {:>8} at x={:.1}m ({:?})",
        report.outcome.to_string(),
        report.landing_position.x,
        report.termination
    );
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>9}  {:>9}  {:>9}",
        "t (s)", "x (m)", "alt (m)", "vx (m/s)", "vy (m/s)"
    );
    println!("  {}", "─".repeat(52));

    let samples = report.trace.samples();
    let sample_interval = (samples.len() / 30).max(1);
    for (i, s) in samples.iter().enumerate() {
        if i % sample_interval != 0 && i != samples.len() - 1 {
            continue;
        }
        println!(
            "  {:>7.2}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9.2}",
            s.time, s.pos.x, s.pos.y, s.vel.x, s.vel.y
        );
    }

    println!();
    println!("  Simulation: {} samples, dt={} s", samples.len(), config.dt);
    println!("====================================================================");
    println!();
}

fn batch(
    settings: Settings,
    engine: &str,
    runs: usize,
    max_wind: f64,
    seed: u64,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = settings.catalog()?;
    let sim = Simulator::new(&catalog, settings.airframe.clone(), settings.sim.clone())?;
    let wind = WindRange {
        max_speed: max_wind,
        ..WindRange::default()
    };
    let summary = run_batch(&sim, engine, runs, wind, seed)?;
    if json {
        write_batch(&mut std::io::stdout().lock(), &summary)?;
        return Ok(());
    }

    println!();
    println!("  Batch: {} x {} (wind 0-{:.1} m/s, seed {})", summary.runs, summary.engine, max_wind, seed);
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Field:         {:>6}   ({:.0}%)",
        summary.field,
        summary.field_fraction() * 100.0
    );
    println!("  Trees:         {:>6}", summary.trees);
    println!("  Timed out:     {:>6}", summary.timed_out);
    println!("  Mean apogee:   {:>8.1} m", summary.mean_altitude);
    println!("  Best apogee:   {:>8.1} m", summary.max_altitude);
    println!();
    Ok(())
}

fn engines(settings: Settings) -> anyhow::Result<()> {
    let catalog = settings.catalog()?;
    println!(
        "  {:<5} {:<8} {:>10} {:>9} {:>8} {:>8}",
        "key", "name", "impulse", "thrust", "burn", "delay"
    );
    for (key, e) in catalog.iter() {
        println!(
            "  {:<5} {:<8} {:>8.2}Ns {:>8.1}N {:>7.3}s {:>7.1}s",
            key, e.name, e.total_impulse, e.average_thrust, e.burn_time, e.igniter_delay
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Cli::parse();
    let settings = load_settings(args.config.as_ref())?;
    match args.command {
        CliCommand::Fly {
            engine,
            wind_speed,
            wind_direction,
            manual_deploy_at,
            deploy_at_apogee,
            csv,
            json,
        } => fly(
            settings,
            &engine,
            wind_speed,
            wind_direction,
            manual_deploy_at,
            deploy_at_apogee,
            csv,
            json,
        ),
        CliCommand::Batch {
            engine,
            runs,
            max_wind,
            seed,
            json,
        } => batch(settings, &engine, runs, max_wind, seed, json),
        CliCommand::Engines => engines(settings),
    }
}
