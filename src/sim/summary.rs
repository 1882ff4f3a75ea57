//! Run totals computed from interval records and the action log.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::engine::STATUS_COMPLETED;
use super::types::{ActionLogEntry, Consumer, IntervalRecord};

/// Per-occupant totals of finished actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NpcTotals {
    pub actions_completed: usize,
    pub energy_kwh: f64,
    pub water_liters: f64,
}

/// Aggregate figures for a complete or interrupted run.
///
/// Built incrementally by the driver, or post-hoc with
/// [`RunSummary::from_records`]; both paths use the same accumulation so they
/// agree for the same run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// `false` when the run was stopped before reaching its end time.
    pub completed: bool,
    pub ticks: usize,
    pub first_interval: Option<DateTime<FixedOffset>>,
    pub last_interval: Option<DateTime<FixedOffset>>,
    pub total_electricity_kwh: f64,
    pub total_water_liters: f64,
    /// Share of `total_electricity_kwh` drawn by the always-on baseline.
    pub baseline_kwh: f64,
    pub peak_interval_kwh: f64,
    pub peak_interval_at: Option<DateTime<FixedOffset>>,
    pub actions_completed: usize,
    /// Keyed by occupant name.
    pub per_npc: BTreeMap<String, NpcTotals>,
}

impl RunSummary {
    /// Computes a summary from a finished run's records.
    pub fn from_records(
        records: &[IntervalRecord],
        actions: &[ActionLogEntry],
        completed: bool,
    ) -> Self {
        let mut s = Self::default();
        for r in records {
            s.add_interval(r);
        }
        for a in actions {
            s.add_action(a);
        }
        s.completed = completed;
        s
    }

    pub fn add_interval(&mut self, r: &IntervalRecord) {
        self.ticks += 1;
        self.first_interval.get_or_insert(r.timestamp);
        self.last_interval = Some(r.timestamp);
        self.total_electricity_kwh += r.electricity_kwh;
        self.total_water_liters += r.water_liters;
        self.baseline_kwh += r
            .device_breakdown
            .electricity
            .get(&Consumer::AlwaysOn)
            .copied()
            .unwrap_or(0.0);
        if self.peak_interval_at.is_none() || r.electricity_kwh > self.peak_interval_kwh {
            self.peak_interval_kwh = r.electricity_kwh;
            self.peak_interval_at = Some(r.timestamp);
        }
    }

    /// Counts a finished action. Away and sleep entries carry no device
    /// and no duration-backed usage and are skipped.
    pub fn add_action(&mut self, a: &ActionLogEntry) {
        if a.status != STATUS_COMPLETED {
            return;
        }
        self.actions_completed += 1;
        let npc = self.per_npc.entry(a.npc.clone()).or_default();
        npc.actions_completed += 1;
        npc.energy_kwh += a.energy_kwh;
        npc.water_liters += a.water_liters;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Summary ---")?;
        let span = match (self.first_interval, self.last_interval) {
            (Some(a), Some(b)) => format!("{} .. {}", a.format("%Y-%m-%d %H:%M"), b.format("%Y-%m-%d %H:%M")),
            _ => "-".to_string(),
        };
        writeln!(f, "Intervals:             {} ({span})", self.ticks)?;
        writeln!(
            f,
            "Status:                {}",
            if self.completed { "completed" } else { "stopped early" }
        )?;
        writeln!(f, "Electricity:           {:.3} kWh", self.total_electricity_kwh)?;
        writeln!(f, "  of which always-on:  {:.3} kWh", self.baseline_kwh)?;
        writeln!(f, "Water:                 {:.1} L", self.total_water_liters)?;
        if let Some(at) = self.peak_interval_at {
            writeln!(
                f,
                "Peak interval:         {:.3} kWh at {}",
                self.peak_interval_kwh,
                at.format("%Y-%m-%d %H:%M")
            )?;
        }
        write!(f, "Actions completed:     {}", self.actions_completed)?;
        for (name, t) in &self.per_npc {
            write!(
                f,
                "\n  {name:<18}  {:>4} actions  {:>8.3} kWh  {:>8.1} L",
                t.actions_completed, t.energy_kwh, t.water_liters
            )?;
        }
        Ok(())
    }
}
