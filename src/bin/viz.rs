use clap::Parser;
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use hobby_rocket_sim::sim::FieldGeometry;
use hobby_rocket_sim::{EngineCatalog, FlightReport, Simulator};

#[derive(Debug, Parser)]
#[clap(author, version, about = "Plot a single model rocket flight", long_about = None)]
struct Args {
    #[clap(short, long, default_value = "C")]
    engine: String,
    #[clap(long, default_value_t = 0.0)]
    wind_speed: f64,
    #[clap(long, default_value_t = 0.0)]
    wind_direction: f64,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let catalog = EngineCatalog::standard();
    let sim = Simulator::with_defaults(&catalog);
    let report = match sim.run_to_completion(&args.engine, args.wind_speed, args.wind_direction) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let app = FlightViz {
        report,
        field: sim.config().field,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Model Rocket Flight", options, Box::new(|_| Ok(Box::new(app))))
}

struct FlightViz {
    report: FlightReport,
    field: FieldGeometry,
}

impl eframe::App for FlightViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let samples = self.report.trace.samples();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Engine: {}", self.report.engine.name));
            ui.label(format!(
                "Apogee: {:.1} m  |  Max speed: {:.1} m/s  |  Landed: {} at x={:.1} m  |  Flight: {:.1} s",
                self.report.max_altitude,
                self.report.trace.max_speed(),
                self.report.outcome,
                self.report.landing_position.x,
                self.report.flight_time,
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Altitude (m)");
                    let points: PlotPoints = samples.iter().map(|s| [s.time, s.pos.y]).collect();
                    Plot::new("altitude")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Altitude", points));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Vertical velocity (m/s)");
                    let points: PlotPoints = samples.iter().map(|s| [s.time, s.vel.y]).collect();
                    Plot::new("velocity")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("vy", points));
                        });
                });
            });

            ui.vertical(|ui| {
                ui.label("Trajectory over the field (m)");
                let path: PlotPoints = samples.iter().map(|s| [s.pos.x, s.pos.y]).collect();
                let top = self.report.max_altitude.max(self.field.tree_height);
                let left: PlotPoints = [[0.0, 0.0], [0.0, top]].into_iter().collect();
                let right: PlotPoints = [[self.field.length, 0.0], [self.field.length, top]]
                    .into_iter()
                    .collect();
                Plot::new("profile")
                    .width(available.x - 8.0)
                    .height(half_h)
                    .x_axis_label("x (m)")
                    .data_aspect(1.0)
                    .show(ui, |plot_ui| {
                        plot_ui.line(Line::new("Field edge", left));
                        plot_ui.line(Line::new("Field edge", right));
                        plot_ui.line(Line::new("Trajectory", path));
                    });
            });
        });
    }
}
