//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeDelta};

use household_sim::config::ScenarioConfig;
use household_sim::devices::ResourceUsage;
use household_sim::environment::NoAmbient;
use household_sim::io::RunLog;
use household_sim::sim::types::Consumer;
use household_sim::sim::{RunSummary, Simulation};

/// Demo household trimmed to one Monday (2025-01-06, +01:00).
pub fn one_day_config() -> ScenarioConfig {
    let mut cfg = ScenarioConfig::demo();
    cfg.simulation.start_date = "2025-01-06".to_string();
    cfg.simulation.end_date = "2025-01-07".to_string();
    cfg
}

/// Builds a seeded driver, panicking on an invalid scenario.
pub fn build(cfg: &ScenarioConfig) -> Simulation {
    match Simulation::seeded(cfg, &NoAmbient) {
        Ok(sim) => sim,
        Err(e) => panic!("scenario should be valid: {e}"),
    }
}

/// Runs `cfg` to completion and returns the driver, its log, and the summary.
pub fn run(cfg: &ScenarioConfig) -> (Simulation, RunLog, RunSummary) {
    let mut sim = build(cfg);
    let mut log = RunLog::new();
    let summary = sim.run(&mut log);
    (sim, log, summary)
}

/// Loads a scenario file shipped under `scenarios/`.
pub fn scenario_file(name: &str) -> ScenarioConfig {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name);
    match ScenarioConfig::from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => panic!("{}: {e}", path.display()),
    }
}

/// Device usage booked in interval breakdowns, baseline excluded.
pub fn metered_device_usage(log: &RunLog) -> ResourceUsage {
    let mut total = ResourceUsage::default();
    for r in &log.intervals {
        total.energy_kwh += r
            .device_breakdown
            .electricity
            .iter()
            .filter(|(k, _)| **k != Consumer::AlwaysOn)
            .map(|(_, v)| v)
            .sum::<f64>();
        total.water_liters += r.device_breakdown.water.values().sum::<f64>();
    }
    total
}

/// End of a logged action.
pub fn end_of(start: DateTime<FixedOffset>, duration_secs: f64) -> DateTime<FixedOffset> {
    start + TimeDelta::milliseconds((duration_secs * 1000.0).round() as i64)
}
