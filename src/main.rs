//! Household simulator entry point: CLI wiring, run, and exports.

use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;

use household_sim::cli::{self, CliOptions};
use household_sim::environment::FixedAmbient;
use household_sim::io::RunLog;
use household_sim::io::export::{
    ActionReport, export_actions_json, export_hourly_csv, export_intervals_csv, export_series_json,
};
use household_sim::sim::{RunSummary, Simulation, StopFlag};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("household_sim=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

fn main() {
    init_tracing();

    let cli = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(1);
    });
    if cli.help {
        cli::print_usage();
        return;
    }

    let scenario = cli.load_scenario().unwrap_or_else(|e| fail(e));

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let ambient = FixedAmbient((&scenario.ambient).into());
    let mut sim = Simulation::seeded(&scenario, &ambient).unwrap_or_else(|e| fail(e));
    let stop = StopFlag::new();
    let on_interrupt = stop.clone();
    // First interrupt stops the run; any later one exits.
    let handler = move || {
        if on_interrupt.is_stopped() {
            process::exit(130);
        }
        on_interrupt.stop();
    };
    if let Err(e) = ctrlc::set_handler(handler) {
        tracing::warn!(error = %e, "Ctrl-C handler not installed; the run cannot be interrupted");
    }

    let mut log = RunLog::new();
    let summary = sim.run_until_stopped(&mut log, &stop);
    if !summary.completed {
        eprintln!("interrupted at {}; reporting the partial run", sim.now());
    }
    stop.stop();

    println!("{summary}");

    if let Err(e) = write_outputs(&cli, &sim, &summary, &log) {
        fail(format!("failed to write output: {e}"));
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(household_sim::api::AppState::from_run(&sim, summary, log));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port()));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| fail(format!("failed to create tokio runtime: {e}")));
        if let Err(e) = rt.block_on(household_sim::api::serve(state, addr)) {
            fail(format!("API server on {addr}: {e}"));
        }
    }
}

fn write_outputs(
    cli: &CliOptions,
    sim: &Simulation,
    summary: &RunSummary,
    log: &RunLog,
) -> household_sim::error::Result<()> {
    if let Some(path) = &cli.intervals_out {
        export_intervals_csv(&log.intervals, path)?;
        announce("Intervals", path);
    }

    if let Some(path) = &cli.hourly_out {
        export_hourly_csv(&log.intervals, path)?;
        announce("Hourly totals", path);
    }

    if let Some(path) = &cli.actions_out {
        export_actions_json(&ActionReport::from_run(sim, summary, log), path)?;
        announce("Action log", path);
    }

    if let Some(path) = &cli.series_out {
        export_series_json(&log.intervals, path)?;
        announce("Interval series", path);
    }

    Ok(())
}

fn announce(what: &str, path: &Path) {
    eprintln!("{what} written to {}", path.display());
}
