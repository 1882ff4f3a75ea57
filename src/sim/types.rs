//! Core simulation types: run configuration, interval records, and log entries.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Serialize, Serializer};

use crate::devices::baseload::per_tick_from_per_5min;
use crate::devices::{DeviceKey, ResourceUsage};
use crate::npc::needs::NeedRates;

/// Driver configuration, passed explicitly to the simulation.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use household_sim::sim::types::SimConfig;
///
/// let tz = FixedOffset::east_opt(0).unwrap();
/// let start = tz.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
/// let end = tz.with_ymd_and_hms(2025, 1, 7, 0, 0, 0).unwrap();
/// let cfg = SimConfig::new(start, end, 5, 42);
/// assert_eq!(cfg.total_ticks(), 288);
/// assert!((cfg.baseline_kwh_per_tick - 0.007).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// First tick timestamp.
    pub start: DateTime<FixedOffset>,
    /// The run stops once simulated time reaches this instant.
    pub end: DateTime<FixedOffset>,
    pub tick: TimeDelta,
    pub tick_minutes: u32,
    /// Master random seed.
    pub seed: u64,
    /// Always-on draw added to every interval (kWh).
    pub baseline_kwh_per_tick: f64,
    /// Simulated time between toilet visits.
    pub toilet_interval: TimeDelta,
    pub need_rates: NeedRates,
}

impl SimConfig {
    /// Creates a configuration with the household defaults.
    ///
    /// # Panics
    ///
    /// Panics if `tick_minutes` is zero.
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        tick_minutes: u32,
        seed: u64,
    ) -> Self {
        assert!(tick_minutes > 0, "tick_minutes must be > 0");
        Self {
            start,
            end,
            tick: TimeDelta::minutes(i64::from(tick_minutes)),
            tick_minutes,
            seed,
            baseline_kwh_per_tick: per_tick_from_per_5min(0.007, tick_minutes),
            toilet_interval: TimeDelta::hours(2),
            need_rates: NeedRates::default(),
        }
    }

    /// Number of ticks between `start` and `end`, rounding a partial tick up.
    pub fn total_ticks(&self) -> usize {
        let span = (self.end - self.start).num_seconds();
        let tick = self.tick.num_seconds();
        if span <= 0 || tick <= 0 {
            return 0;
        }
        ((span + tick - 1) / tick) as usize
    }

    pub fn tick_hours(&self) -> f64 {
        f64::from(self.tick_minutes) / 60.0
    }
}

/// Who consumed a slice of an interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Consumer {
    /// Fridge, router, and standby baseline.
    AlwaysOn,
    Device(DeviceKey),
}

impl fmt::Display for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consumer::AlwaysOn => f.write_str("always_on"),
            Consumer::Device(key) => write!(f, "{key}"),
        }
    }
}

impl Serialize for Consumer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-consumer split of an interval.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceBreakdown {
    /// kWh per consumer, hot-water heating included under the fixture.
    pub electricity: BTreeMap<Consumer, f64>,
    /// Liters per consumer.
    pub water: BTreeMap<Consumer, f64>,
}

impl DeviceBreakdown {
    /// Adds `usage` under `consumer`, skipping zero components.
    pub fn add(&mut self, consumer: Consumer, usage: ResourceUsage) {
        if usage.energy_kwh != 0.0 {
            *self.electricity.entry(consumer.clone()).or_default() += usage.energy_kwh;
        }
        if usage.water_liters != 0.0 {
            *self.water.entry(consumer).or_default() += usage.water_liters;
        }
    }
}

/// Consumption over one tick. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalRecord {
    /// Start of the interval.
    pub timestamp: DateTime<FixedOffset>,
    pub electricity_kwh: f64,
    pub water_liters: f64,
    pub device_breakdown: DeviceBreakdown,
}

impl IntervalRecord {
    pub fn usage(&self) -> ResourceUsage {
        ResourceUsage {
            energy_kwh: self.electricity_kwh,
            water_liters: self.water_liters,
        }
    }
}

/// One line of the per-NPC action log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionLogEntry {
    pub timestamp: DateTime<FixedOffset>,
    pub npc: String,
    /// Action name, or a state label such as `sleep` or an away reason.
    pub action: String,
    pub device_used: Option<DeviceKey>,
    pub energy_kwh: f64,
    pub water_liters: f64,
    pub duration_secs: f64,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 6, h, m, 0)
            .unwrap()
    }

    #[test]
    fn partial_tick_rounds_up() {
        let cfg = SimConfig::new(at(0, 0), at(0, 12), 5, 1);
        assert_eq!(cfg.total_ticks(), 3);
    }

    #[test]
    fn inverted_window_has_no_ticks() {
        let cfg = SimConfig::new(at(1, 0), at(0, 0), 5, 1);
        assert_eq!(cfg.total_ticks(), 0);
    }

    #[test]
    fn consumer_names() {
        assert_eq!(Consumer::AlwaysOn.to_string(), "always_on");
        assert_eq!(
            Consumer::Device(DeviceKey::new("Bathroom", "Shower")).to_string(),
            "bathroom/shower"
        );
    }

    #[test]
    fn breakdown_skips_zero_components() {
        let mut b = DeviceBreakdown::default();
        b.add(
            Consumer::Device(DeviceKey::new("Bathroom", "toilet")),
            ResourceUsage {
                energy_kwh: 0.0,
                water_liters: 6.0,
            },
        );
        assert!(b.electricity.is_empty());
        assert_eq!(b.water.len(), 1);
    }

    #[test]
    fn breakdown_serializes_with_string_keys() {
        let mut b = DeviceBreakdown::default();
        b.add(
            Consumer::AlwaysOn,
            ResourceUsage {
                energy_kwh: 0.007,
                water_liters: 0.0,
            },
        );
        let json = serde_json::to_string(&b).unwrap_or_default();
        assert!(json.contains("\"always_on\":0.007"), "{json}");
    }
}
