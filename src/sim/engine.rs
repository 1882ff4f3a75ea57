//! Simulation driver that advances time, ticks occupants, and meters usage.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, FixedOffset};

use crate::config::ScenarioConfig;
use crate::devices::ResourceUsage;
use crate::devices::baseload::BaseLoad;
use crate::environment::{self, AmbientProvider};
use crate::error::SimError;
use crate::house::House;
use crate::io::sink::OutputSink;
use crate::npc::{ActionCatalog, DecisionPolicy, Npc, NpcEvent, NpcId, TickContext};

use super::clock::Clock;
use super::rng::{RandomSource, SeededRandom};
use super::summary::RunSummary;
use super::types::{ActionLogEntry, Consumer, DeviceBreakdown, IntervalRecord, SimConfig};

/// Status written on log entries of finished actions.
pub const STATUS_COMPLETED: &str = "completed";

/// Cooperative cancellation flag, checked between ticks.
///
/// Clones share the same flag, so one can be handed to a signal handler
/// or another thread.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Simulation driver owning the house, the occupants, and the clock.
///
/// Generic over `R: RandomSource` for static dispatch; tests plug in
/// [`ScriptedRandom`](super::rng::ScriptedRandom).
pub struct Simulation<R: RandomSource = SeededRandom> {
    config: SimConfig,
    house: House,
    npcs: Vec<Npc>,
    catalog: ActionCatalog,
    policy: DecisionPolicy,
    baseload: BaseLoad,
    clock: Clock,
    rng: R,
    summary: RunSummary,
    simulation_type: String,
}

impl Simulation<SeededRandom> {
    /// Builds a driver seeded from `[simulation].seed`.
    ///
    /// # Errors
    ///
    /// See [`Simulation::from_config`].
    pub fn seeded(cfg: &ScenarioConfig, ambient: &dyn AmbientProvider) -> Result<Self, SimError> {
        Self::from_config(cfg, ambient, SeededRandom::new(cfg.simulation.seed))
    }
}

impl<R: RandomSource> Simulation<R> {
    /// Creates a driver from explicit parts.
    pub fn new(config: SimConfig, house: House, npcs: Vec<Npc>, rng: R) -> Self {
        let clock = Clock::new(config.start, config.end, config.tick);
        let baseload = BaseLoad::from_config(&config);
        Self {
            config,
            house,
            npcs,
            catalog: ActionCatalog::standard(),
            policy: DecisionPolicy::standard(),
            baseload,
            clock,
            rng,
            summary: RunSummary::default(),
            simulation_type: String::new(),
        }
    }

    /// Validates a scenario and builds the driver.
    ///
    /// Ambient conditions are read once from `ambient`, falling back to the
    /// scenario's `[ambient]` section. Initial needs are sampled from `rng`
    /// in occupant order.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] with every validation problem.
    pub fn from_config(
        cfg: &ScenarioConfig,
        ambient: &dyn AmbientProvider,
        mut rng: R,
    ) -> Result<Self, SimError> {
        let errors = cfg.validate();
        if !errors.is_empty() {
            return Err(SimError::Config(errors));
        }

        let config = cfg.simulation.to_sim_config()?;
        let mut house = House::from_config(cfg)?;
        house.set_ambient(environment::resolve(ambient, &cfg.ambient));

        let mut npcs = Vec::with_capacity(cfg.npcs.len());
        for (i, n) in cfg.npcs.iter().enumerate() {
            let profile = n.to_profile(&format!("npcs[{i}]"))?;
            npcs.push(Npc::new(NpcId(i), profile, &mut rng));
        }

        let mut sim = Self::new(config, house, npcs, rng);
        sim.simulation_type = cfg.simulation.simulation_type.clone();
        Ok(sim)
    }

    /// Executes one tick and returns its interval record, or `None` once
    /// simulated time has reached the end.
    pub fn step(&mut self, sink: &mut dyn OutputSink) -> Option<IntervalRecord> {
        let (step, now) = self.clock.tick()?;
        let interval_end = now + self.config.tick;

        self.house.set_time(now);
        if self.house.reset_daily_usage(now.date_naive()) && step > 0 {
            tracing::debug!(date = %now.date_naive(), "daily usage counters reset");
        }

        let mut breakdown = DeviceBreakdown::default();
        let mut total = ResourceUsage::default();

        let base = self.baseload.usage();
        breakdown.add(Consumer::AlwaysOn, base);
        total += base;

        let ctx = TickContext {
            now,
            catalog: &self.catalog,
            policy: &self.policy,
            rates: &self.config.need_rates,
            toilet_interval: self.config.toilet_interval,
        };
        for npc in &mut self.npcs {
            let events = npc.tick(&ctx, &mut self.house, &mut self.rng);
            for event in events {
                if let Some(entry) = log_entry(npc, &event, now, self.config.tick_minutes) {
                    self.summary.add_action(&entry);
                    sink.record_action(&entry);
                }
            }
        }

        let heating = self.house.electric_heating();
        for npc in &self.npcs {
            let Some(active) = npc.current() else {
                continue;
            };
            let Some(key) = &active.device else {
                continue;
            };
            let Some(spec) = self.house.device(key) else {
                continue;
            };
            let from = active.start.max(now);
            let to = active.end.min(interval_end);
            let overlap_ms = (to - from).num_milliseconds();
            if overlap_ms <= 0 {
                continue;
            }
            let usage = spec.usage_for(overlap_ms as f64 / 1000.0, active.duration_secs, heating);
            breakdown.add(Consumer::Device(key.clone()), usage);
            total += usage;
        }

        self.house.add_usage(total);
        let record = IntervalRecord {
            timestamp: now,
            electricity_kwh: total.energy_kwh,
            water_liters: total.water_liters,
            device_breakdown: breakdown,
        };
        self.summary.add_interval(&record);
        sink.record_interval(&record);
        Some(record)
    }

    /// Runs every remaining tick and returns the run summary.
    pub fn run(&mut self, sink: &mut dyn OutputSink) -> RunSummary {
        self.run_until_stopped(sink, &StopFlag::new())
    }

    /// Runs until the end time or until `stop` is raised between ticks.
    pub fn run_until_stopped(&mut self, sink: &mut dyn OutputSink, stop: &StopFlag) -> RunSummary {
        tracing::info!(
            house = %self.house.name(),
            npcs = self.npcs.len(),
            start = %self.config.start,
            end = %self.config.end,
            tick_minutes = self.config.tick_minutes,
            ticks = self.config.total_ticks(),
            baseline_kw = self.baseload.power_kw(self.config.tick_minutes),
            "simulation started"
        );
        while !self.clock.is_finished() {
            if stop.is_stopped() {
                tracing::info!(at = %self.clock.now(), "simulation stopped");
                break;
            }
            if self.step(sink).is_none() {
                break;
            }
        }
        let summary = self.summary();
        tracing::info!(
            ticks = summary.ticks,
            electricity_kwh = summary.total_electricity_kwh,
            water_liters = summary.total_water_liters,
            completed = summary.completed,
            "simulation finished"
        );
        summary
    }

    /// Totals so far; `completed` reflects whether the end time was reached.
    pub fn summary(&self) -> RunSummary {
        let mut s = self.summary.clone();
        s.completed = self.clock.is_finished();
        s
    }

    pub fn house(&self) -> &House {
        &self.house
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Label written into exported action logs.
    pub fn simulation_type(&self) -> &str {
        &self.simulation_type
    }

    /// Start of the next tick.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }
}

/// Converts an occupant event into an action log line, if it warrants one.
fn log_entry(
    npc: &Npc,
    event: &NpcEvent,
    now: DateTime<FixedOffset>,
    tick_minutes: u32,
) -> Option<ActionLogEntry> {
    let tick_secs = f64::from(tick_minutes) * 60.0;
    let idle_entry = |label: &str| ActionLogEntry {
        timestamp: now,
        npc: npc.name().to_string(),
        action: label.to_string(),
        device_used: None,
        energy_kwh: 0.0,
        water_liters: 0.0,
        duration_secs: tick_secs,
        status: npc.status().to_string(),
    };
    match event {
        NpcEvent::Finished {
            action,
            device,
            usage,
            duration_secs,
            started_at,
        } => Some(ActionLogEntry {
            timestamp: *started_at,
            npc: npc.name().to_string(),
            action: action.name().to_string(),
            device_used: device.clone(),
            energy_kwh: usage.energy_kwh,
            water_liters: usage.water_liters,
            duration_secs: *duration_secs,
            status: STATUS_COMPLETED.to_string(),
        }),
        NpcEvent::Away { .. } | NpcEvent::FellAsleep | NpcEvent::Asleep => {
            Some(idle_entry(event.label()))
        }
        NpcEvent::Started { action, .. } => {
            tracing::trace!(npc = %npc.name(), %action, "action started");
            None
        }
        NpcEvent::Refused { action, reason } => {
            tracing::debug!(npc = %npc.name(), %action, %reason, "action refused");
            None
        }
        NpcEvent::WokeUp => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::NoAmbient;
    use crate::io::sink::{Discard, RunLog};
    use crate::sim::rng::ScriptedRandom;

    fn one_day(mut cfg: ScenarioConfig) -> ScenarioConfig {
        cfg.simulation.start_date = "2025-01-06".into();
        cfg.simulation.end_date = "2025-01-07".into();
        cfg
    }

    #[test]
    fn invalid_config_is_rejected_before_running() {
        let mut cfg = ScenarioConfig::demo();
        cfg.simulation.tick_minutes = 0;
        let result = Simulation::seeded(&cfg, &NoAmbient);
        assert!(matches!(result, Err(SimError::Config(ref e)) if !e.is_empty()));
    }

    #[test]
    fn empty_house_still_draws_baseline() {
        let mut cfg = one_day(ScenarioConfig::demo());
        cfg.npcs.clear();
        let Ok(mut sim) = Simulation::from_config(&cfg, &NoAmbient, ScriptedRandom::new()) else {
            panic!("valid config");
        };
        let mut log = RunLog::new();
        let summary = sim.run(&mut log);
        assert_eq!(log.intervals.len(), 288);
        assert!(summary.completed);
        for r in &log.intervals {
            assert!((r.electricity_kwh - 0.007).abs() < 1e-12);
            assert_eq!(r.water_liters, 0.0);
            assert_eq!(r.device_breakdown.electricity.len(), 1);
        }
        assert!((summary.total_electricity_kwh - 288.0 * 0.007).abs() < 1e-9);
    }

    #[test]
    fn stop_flag_halts_between_ticks() {
        let cfg = one_day(ScenarioConfig::demo());
        let Ok(mut sim) = Simulation::seeded(&cfg, &NoAmbient) else {
            panic!("valid config");
        };
        let mut log = RunLog::new();
        for _ in 0..10 {
            sim.step(&mut log);
        }
        let stop = StopFlag::new();
        stop.clone().stop();
        let summary = sim.run_until_stopped(&mut log, &stop);
        assert!(!summary.completed);
        assert_eq!(summary.ticks, 10);
        assert_eq!(log.intervals.len(), 10);
    }

    #[test]
    fn step_returns_none_after_end() {
        let mut cfg = one_day(ScenarioConfig::demo());
        cfg.simulation.tick_minutes = 720;
        let Ok(mut sim) = Simulation::seeded(&cfg, &NoAmbient) else {
            panic!("valid config");
        };
        assert!(sim.step(&mut Discard).is_some());
        assert!(sim.step(&mut Discard).is_some());
        assert!(sim.step(&mut Discard).is_none());
        assert!(sim.summary().completed);
    }

    #[test]
    fn breakdown_sums_to_interval_totals() {
        let cfg = one_day(ScenarioConfig::demo());
        let Ok(mut sim) = Simulation::seeded(&cfg, &NoAmbient) else {
            panic!("valid config");
        };
        let mut log = RunLog::new();
        sim.run(&mut log);
        for r in &log.intervals {
            let e: f64 = r.device_breakdown.electricity.values().sum();
            let w: f64 = r.device_breakdown.water.values().sum();
            assert!((e - r.electricity_kwh).abs() < 1e-9);
            assert!((w - r.water_liters).abs() < 1e-9);
        }
    }

    #[test]
    fn device_holders_are_running_their_actions() {
        let cfg = one_day(ScenarioConfig::demo());
        let Ok(mut sim) = Simulation::seeded(&cfg, &NoAmbient) else {
            panic!("valid config");
        };
        let mut log = RunLog::new();
        while sim.step(&mut log).is_some() {
            for spec in sim.house().registry().iter() {
                if let Some(holder) = sim.house().holder(&spec.key) {
                    let npc = &sim.npcs()[holder.0];
                    let device = npc.current().and_then(|a| a.device.as_ref());
                    assert_eq!(device, Some(&spec.key));
                }
            }
        }
    }
}
