use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use eframe::egui;

use spinogram::app::SpinogramApp;
use spinogram::data::{histogram, loader};
use spinogram::state::AppState;

/// Plots radial histograms of the spin distribution in an UppASD restart file.
#[derive(Parser)]
#[command(name = "spinogram", version, about)]
struct Args {
    /// UppASD restart.*.out file (glob pattern, must match exactly one file)
    #[arg(short, long, default_value = "restart.*.out")]
    file: String,

    /// Number of magnetic sites in the posfile; 0 infers site types from the
    /// moment magnitudes instead of striping
    #[arg(short = 's', long, default_value_t = 0)]
    nsites: usize,

    /// Number of bins to divide the radial angle in
    #[arg(long, default_value_t = 180)]
    ndiv: usize,

    /// Select an explicit simulation step instead of the latest
    #[arg(long)]
    step: Option<i64>,

    /// Select an explicit ensemble index instead of the latest
    #[arg(long)]
    ens: Option<i64>,
}

/// Resolve the input glob to exactly one path.
fn resolve_input(pattern: &str) -> Result<PathBuf> {
    let matches: Vec<PathBuf> = glob::glob(pattern)
        .with_context(|| format!("invalid glob pattern '{pattern}'"))?
        .filter_map(|m| m.ok())
        .collect();

    match matches.as_slice() {
        [one] => Ok(one.clone()),
        [] => bail!("no file matches '{pattern}'"),
        many => bail!(
            "'{pattern}' is ambiguous: {} files match, pass one with --file",
            many.len()
        ),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let path = resolve_input(&args.file)?;
    let snapshot = loader::load_snapshot(
        &path,
        args.step.map(|s| s as f64),
        args.ens.map(|e| e as f64),
    )?;
    log::info!(
        "Loaded {} moments at step {}, ensemble {} from {}",
        snapshot.len(),
        snapshot.step,
        snapshot.config,
        path.display()
    );

    let bundle = histogram::build(&snapshot.samples, args.nsites, args.ndiv)?;
    log::info!(
        "Built {} histogram series over {} azimuthal bins",
        bundle.entries.len(),
        bundle.entries[0].phi.len() / 2
    );

    let state = AppState::new(&snapshot, bundle);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 540.0])
            .with_min_inner_size([850.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Spinogram",
        options,
        Box::new(move |_cc| Ok(Box::new(SpinogramApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("starting the viewer: {e}"))
}
