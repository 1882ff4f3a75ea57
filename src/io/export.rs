//! CSV and JSON export of interval records and the action log.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::io::RunLog;
use crate::sim::hourly::{self, HourlyTotals};
use crate::sim::rng::RandomSource;
use crate::sim::types::{ActionLogEntry, IntervalRecord};
use crate::sim::{RunSummary, Simulation};

/// Column header of the interval CSV.
const INTERVAL_HEADER: &str = "timestamp,electricity_kwh,water_liters";

/// Column header of the hourly CSV.
const HOURLY_HEADER: &str = "hour_start,electricity_kwh,water_liters,intervals";

fn create(path: &Path) -> io::Result<io::BufWriter<File>> {
    Ok(io::BufWriter::new(File::create(path)?))
}

/// Exports interval records to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_intervals_csv(records: &[IntervalRecord], path: &Path) -> io::Result<()> {
    write_intervals_csv(records, create(path)?)
}

/// Writes one row per interval to any writer. Output is deterministic for
/// identical input.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_intervals_csv(records: &[IntervalRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(INTERVAL_HEADER.split(','))?;
    for r in records {
        wtr.write_record(&[
            r.timestamp.to_rfc3339(),
            format!("{:.6}", r.electricity_kwh),
            format!("{:.3}", r.water_liters),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports the hourly rollup of `records` to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_hourly_csv(records: &[IntervalRecord], path: &Path) -> io::Result<()> {
    write_hourly_csv(&hourly::rollup(records), create(path)?)
}

/// Writes hourly totals as CSV.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_hourly_csv(hours: &[HourlyTotals], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HOURLY_HEADER.split(','))?;
    for h in hours {
        wtr.write_record(&[
            h.hour_start.to_rfc3339(),
            format!("{:.6}", h.electricity_kwh),
            format!("{:.3}", h.water_liters),
            h.intervals.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Results document for the action log.
#[derive(Debug, Serialize)]
pub struct ActionReport<'a> {
    pub house_name: &'a str,
    pub total_electricity_kwh: f64,
    pub total_water_liters: f64,
    /// Simulated span, e.g. `"7 days 00:00:00"`.
    pub total_time: String,
    pub type_of_simulation: &'a str,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    /// False when the run was stopped before `end_date`.
    pub completed: bool,
    pub actions: &'a [ActionLogEntry],
}

impl<'a> ActionReport<'a> {
    /// Report for a finished or stopped run. `total_time` covers only the
    /// ticks actually simulated.
    pub fn from_run<R: RandomSource>(
        sim: &'a Simulation<R>,
        summary: &RunSummary,
        log: &'a RunLog,
    ) -> Self {
        let cfg = sim.config();
        Self {
            house_name: sim.house().name(),
            total_electricity_kwh: summary.total_electricity_kwh,
            total_water_liters: summary.total_water_liters,
            total_time: format_span(cfg.start, sim.now().min(cfg.end)),
            type_of_simulation: sim.simulation_type(),
            start_date: cfg.start,
            end_date: cfg.end,
            completed: summary.completed,
            actions: &log.actions,
        }
    }
}

/// Formats a span as `"{days} days HH:MM:SS"`.
pub fn format_span(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> String {
    let secs = (end - start).num_seconds().max(0);
    let days = secs / 86_400;
    let rem = secs % 86_400;
    format!(
        "{days} days {:02}:{:02}:{:02}",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Exports the action report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an `io::Error` if file creation, serialization, or writing fails.
pub fn export_actions_json(report: &ActionReport<'_>, path: &Path) -> io::Result<()> {
    write_actions_json(report, create(path)?)
}

/// Writes the action report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_actions_json(report: &ActionReport<'_>, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()
}

/// Exports interval records, breakdown included, as a JSON array.
///
/// # Errors
///
/// Returns an `io::Error` if file creation, serialization, or writing fails.
pub fn export_series_json(records: &[IntervalRecord], path: &Path) -> io::Result<()> {
    write_series_json(records, create(path)?)
}

/// Writes interval records as a JSON array.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_series_json(records: &[IntervalRecord], mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer(&mut writer, records)?;
    writer.flush()
}
