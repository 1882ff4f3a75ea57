//! TOML/JSON scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::devices::baseload::per_tick_from_per_5min;
use crate::devices::types::DEFAULT_HOT_WATER_FIXTURES;
use crate::devices::{DeviceKey, DeviceKind, DeviceSpec, WaterFlow};
use crate::npc::agent::NpcProfile;
use crate::npc::needs::{AgeGroup, PinnedNeeds};
use crate::npc::schedule::{OutOfHomePeriod, SleepWindow, TimeWindow};
use crate::sim::types::SimConfig;

/// Longest configurable single use of a device, one day.
pub const MAX_DURATION_MINUTES: f64 = 1440.0;

/// Top-level scenario configuration.
///
/// Sections other than `devices` and `npcs` have defaults matching the
/// `demo` preset's house. Load from TOML with
/// [`ScenarioConfig::from_toml_file`], from JSON with
/// [`ScenarioConfig::from_json_str`], or use [`ScenarioConfig::demo`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulation window and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Dwelling geometry and informational equipment.
    #[serde(default)]
    pub house: HouseConfig,
    /// Fallback ambient conditions when no provider answers.
    #[serde(default)]
    pub ambient: AmbientConfig,
    /// Installed devices, in contention order.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
    /// Household occupants, in processing order.
    #[serde(default)]
    pub npcs: Vec<NpcConfig>,
}

/// Simulation window and global parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// First simulated day (`YYYY-MM-DD`, starts at 00:00).
    pub start_date: String,
    /// Day the run stops at (`YYYY-MM-DD`, exclusive, 00:00).
    pub end_date: String,
    /// Tick length in minutes (must be > 0).
    pub tick_minutes: u32,
    /// Master random seed.
    pub seed: u64,
    /// UTC offset of simulated timestamps, in whole hours.
    pub utc_offset_hours: i32,
    /// Always-on draw (fridge, router, standby) per 5 minutes, in kWh.
    pub baseline_kwh_per_5min: f64,
    /// Simulated minutes between toilet visits.
    pub toilet_interval_minutes: u32,
    /// Free-form run label written into the action log.
    pub simulation_type: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_date: "2025-01-06".to_string(),
            end_date: "2025-01-13".to_string(),
            tick_minutes: 5,
            seed: 42,
            utc_offset_hours: 1,
            baseline_kwh_per_5min: 0.007,
            toilet_interval_minutes: 120,
            simulation_type: "fast_forward".to_string(),
        }
    }
}

/// Room counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoomsConfig {
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub kitchen: u32,
    pub living_room: u32,
    pub dining_room: u32,
    pub garage: u32,
    pub garden: u32,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            bedrooms: 2,
            bathrooms: 1,
            kitchen: 1,
            living_room: 1,
            dining_room: 1,
            garage: 0,
            garden: 0,
        }
    }
}

/// PV array description (informational).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Panel efficiency (0.0–1.0).
    pub panel_efficiency: f64,
    pub number_of_panels: u32,
    pub panel_size_m2: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            panel_efficiency: 0.2,
            number_of_panels: 8,
            panel_size_m2: 1.7,
        }
    }
}

/// Home battery description (informational).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    pub capacity_ah: f64,
    pub voltage: f64,
    pub initial_state_of_charge_percent: f64,
    pub charging_efficiency: f64,
    pub discharging_efficiency: f64,
    pub energy_loss_conversion: f64,
    pub degrading_ratio: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_ah: 200.0,
            voltage: 48.0,
            initial_state_of_charge_percent: 50.0,
            charging_efficiency: 0.95,
            discharging_efficiency: 0.95,
            energy_loss_conversion: 0.02,
            degrading_ratio: 0.001,
        }
    }
}

/// Water-heating method selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaterHeatingConfig {
    /// Selected method; `"electric"` (or `"electricity"`) enables the hot-water surcharge.
    pub method: String,
    /// Methods the household could switch to.
    pub options: Vec<String>,
}

impl Default for WaterHeatingConfig {
    fn default() -> Self {
        Self {
            method: "electric".to_string(),
            options: vec![
                "electric".to_string(),
                "gas".to_string(),
                "solar_thermal".to_string(),
            ],
        }
    }
}

/// Emission factors, passed through to reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmissionFactorsConfig {
    pub solar_panel_kg_co2_per_kwh_min: f64,
    pub solar_panel_kg_co2_per_kwh_max: f64,
    pub cold_water_kg_co2_per_liter: f64,
    pub hot_water_kg_co2_per_liter: f64,
}

impl Default for EmissionFactorsConfig {
    fn default() -> Self {
        Self {
            solar_panel_kg_co2_per_kwh_min: 0.02,
            solar_panel_kg_co2_per_kwh_max: 0.05,
            cold_water_kg_co2_per_liter: 0.0003,
            hot_water_kg_co2_per_liter: 0.002,
        }
    }
}

/// Dwelling description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseConfig {
    pub name: String,
    pub rooms: RoomsConfig,
    pub volume_cubic_meters: f64,
    pub solar: SolarConfig,
    pub battery: BatteryConfig,
    pub water_heating: WaterHeatingConfig,
    pub emission_factors: EmissionFactorsConfig,
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self {
            name: "Demo House".to_string(),
            rooms: RoomsConfig::default(),
            volume_cubic_meters: 250.0,
            solar: SolarConfig::default(),
            battery: BatteryConfig::default(),
            water_heating: WaterHeatingConfig::default(),
            emission_factors: EmissionFactorsConfig::default(),
        }
    }
}

/// Ambient conditions used when the environment provider fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AmbientConfig {
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            temperature_celsius: 20.0,
            humidity_percent: 50.0,
        }
    }
}

/// Device kind tag as written in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKindConfig {
    Water,
    #[serde(alias = "electric")]
    Electricity,
}

/// One installed device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    pub room: String,
    #[serde(alias = "device")]
    pub name: String,
    pub kind: DeviceKindConfig,
    #[serde(default)]
    pub power_watts: Option<f64>,
    #[serde(default, alias = "flow_rate_liters_per_use")]
    pub flow_liters_per_use: Option<f64>,
    #[serde(default, alias = "flow_rate_liters_per_minute")]
    pub flow_liters_per_minute: Option<f64>,
    #[serde(default)]
    pub max_uses_per_day: Option<u32>,
    /// `[min, max]` run length in minutes.
    #[serde(default, alias = "typical_duration")]
    pub typical_duration_minutes: Option<[f64; 2]>,
    /// Defaults to true for `shower` and `sink`.
    #[serde(default)]
    pub hot_water: Option<bool>,
}

/// One out-of-home period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutOfHomeConfig {
    /// Weekday names; empty means every day.
    #[serde(default)]
    pub days: Vec<String>,
    /// `HH:MM`.
    pub start: String,
    /// `HH:MM`; earlier than `start` wraps past midnight.
    pub end: String,
    #[serde(default = "default_away_reason")]
    pub reason: String,
}

fn default_away_reason() -> String {
    "away".to_string()
}

/// Optional pinned starting needs; unset needs are sampled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitialNeedsConfig {
    pub hunger: Option<f64>,
    pub energy: Option<f64>,
    pub hygiene: Option<f64>,
    pub fun: Option<f64>,
}

/// One household occupant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NpcConfig {
    pub name: String,
    pub age_group: AgeGroup,
    /// `HH:MM`.
    pub sleep_start: String,
    /// `HH:MM`.
    pub sleep_end: String,
    #[serde(default, alias = "out_of_home_periods")]
    pub out_of_home: Vec<OutOfHomeConfig>,
    #[serde(default)]
    pub initial_needs: Option<InitialNeedsConfig>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.tick_minutes"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| ConfigError::new(field, format!("expected YYYY-MM-DD, got \"{value}\" ({e})")))
}

fn parse_clock(field: &str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|e| ConfigError::new(field, format!("expected HH:MM, got \"{value}\" ({e})")))
}

fn check_need(field: &str, value: Option<f64>, errors: &mut Vec<ConfigError>) {
    if let Some(v) = value {
        if !(0.0..=100.0).contains(&v) {
            errors.push(ConfigError::new(field, "must be in [0, 100]"));
        }
    }
}

impl SimulationConfig {
    /// Converts into the driver's [`SimConfig`].
    ///
    /// # Errors
    ///
    /// Returns the first malformed or out-of-range field.
    pub fn to_sim_config(&self) -> Result<SimConfig, ConfigError> {
        let offset = self
            .utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| ConfigError::new("simulation.utc_offset_hours", "must be in [-23, 23]"))?;
        let start_date = parse_date("simulation.start_date", &self.start_date)?;
        let end_date = parse_date("simulation.end_date", &self.end_date)?;
        let at_midnight = |field: &str, d: NaiveDate| {
            d.and_time(NaiveTime::MIN)
                .and_local_timezone(offset)
                .single()
                .ok_or_else(|| ConfigError::new(field, "not representable in the configured offset"))
        };
        let start = at_midnight("simulation.start_date", start_date)?;
        let end = at_midnight("simulation.end_date", end_date)?;

        if end <= start {
            return Err(ConfigError::new(
                "simulation.end_date",
                "must be after simulation.start_date",
            ));
        }
        if self.tick_minutes == 0 {
            return Err(ConfigError::new("simulation.tick_minutes", "must be > 0"));
        }
        if !(self.baseline_kwh_per_5min >= 0.0) {
            return Err(ConfigError::new(
                "simulation.baseline_kwh_per_5min",
                "must be >= 0",
            ));
        }
        if self.toilet_interval_minutes == 0 {
            return Err(ConfigError::new(
                "simulation.toilet_interval_minutes",
                "must be > 0",
            ));
        }

        let mut cfg = SimConfig::new(start, end, self.tick_minutes, self.seed);
        cfg.baseline_kwh_per_tick =
            per_tick_from_per_5min(self.baseline_kwh_per_5min, self.tick_minutes);
        cfg.toilet_interval = TimeDelta::minutes(i64::from(self.toilet_interval_minutes));
        Ok(cfg)
    }
}

impl DeviceConfig {
    /// Converts into a [`DeviceSpec`], checking flow and duration fields.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` rooted at `path` for the first bad field.
    pub fn to_spec(&self, path: &str) -> Result<DeviceSpec, ConfigError> {
        if self.room.trim().is_empty() {
            return Err(ConfigError::new(format!("{path}.room"), "must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::new(format!("{path}.name"), "must not be empty"));
        }

        let power_watts = self.power_watts.unwrap_or(0.0);
        if !(power_watts >= 0.0) {
            return Err(ConfigError::new(format!("{path}.power_watts"), "must be >= 0"));
        }

        let water_flow = match (self.flow_liters_per_use, self.flow_liters_per_minute) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::new(
                    format!("{path}.flow_liters_per_use"),
                    "set either flow_liters_per_use or flow_liters_per_minute, not both",
                ));
            }
            (Some(l), None) if l >= 0.0 => Some(WaterFlow::PerUse(l)),
            (None, Some(l)) if l >= 0.0 => Some(WaterFlow::PerMinute(l)),
            (None, None) => None,
            _ => {
                return Err(ConfigError::new(format!("{path}.flow"), "must be >= 0"));
            }
        };

        let kind = match self.kind {
            DeviceKindConfig::Water => {
                if water_flow.is_none() {
                    return Err(ConfigError::new(
                        format!("{path}.kind"),
                        "water devices need flow_liters_per_use or flow_liters_per_minute",
                    ));
                }
                DeviceKind::Water
            }
            DeviceKindConfig::Electricity => {
                if self.power_watts.is_none() {
                    return Err(ConfigError::new(
                        format!("{path}.power_watts"),
                        "required for electricity devices",
                    ));
                }
                DeviceKind::Electricity
            }
        };

        let typical_duration_minutes = match self.typical_duration_minutes {
            Some([lo, hi]) if lo >= 0.0 && lo <= hi && hi <= MAX_DURATION_MINUTES => {
                Some((lo, hi))
            }
            Some(_) => {
                return Err(ConfigError::new(
                    format!("{path}.typical_duration_minutes"),
                    format!("must be [min, max] with 0 <= min <= max <= {MAX_DURATION_MINUTES}"),
                ));
            }
            None => None,
        };

        let key = DeviceKey::new(&self.room, &self.name);
        let hot_water = self
            .hot_water
            .unwrap_or_else(|| DEFAULT_HOT_WATER_FIXTURES.contains(&key.device.as_str()));

        Ok(DeviceSpec {
            key,
            kind,
            power_watts,
            water_flow,
            max_uses_per_day: self.max_uses_per_day,
            typical_duration_minutes,
            hot_water,
        })
    }
}

impl OutOfHomeConfig {
    fn to_period(&self, path: &str) -> Result<OutOfHomePeriod, ConfigError> {
        let start = parse_clock(&format!("{path}.start"), &self.start)?;
        let end = parse_clock(&format!("{path}.end"), &self.end)?;
        let mut days = Vec::with_capacity(self.days.len());
        for (i, d) in self.days.iter().enumerate() {
            let day = d.trim().parse::<Weekday>().map_err(|_| {
                ConfigError::new(format!("{path}.days[{i}]"), format!("unknown weekday \"{d}\""))
            })?;
            days.push(day);
        }
        Ok(OutOfHomePeriod {
            days,
            window: TimeWindow::new(start, end),
            reason: self.reason.clone(),
        })
    }
}

impl NpcConfig {
    /// Converts into an [`NpcProfile`].
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` rooted at `path` for the first bad field.
    pub fn to_profile(&self, path: &str) -> Result<NpcProfile, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::new(format!("{path}.name"), "must not be empty"));
        }
        let sleep_start = parse_clock(&format!("{path}.sleep_start"), &self.sleep_start)?;
        let sleep_end = parse_clock(&format!("{path}.sleep_end"), &self.sleep_end)?;

        let mut away = Vec::with_capacity(self.out_of_home.len());
        for (i, p) in self.out_of_home.iter().enumerate() {
            away.push(p.to_period(&format!("{path}.out_of_home[{i}]"))?);
        }

        let pinned = self.initial_needs.clone().unwrap_or_default();
        let mut errors = Vec::new();
        check_need(&format!("{path}.initial_needs.hunger"), pinned.hunger, &mut errors);
        check_need(&format!("{path}.initial_needs.energy"), pinned.energy, &mut errors);
        check_need(&format!("{path}.initial_needs.hygiene"), pinned.hygiene, &mut errors);
        check_need(&format!("{path}.initial_needs.fun"), pinned.fun, &mut errors);
        if let Some(e) = errors.into_iter().next() {
            return Err(e);
        }

        Ok(NpcProfile {
            name: self.name.trim().to_string(),
            age_group: self.age_group,
            sleep: SleepWindow::new(sleep_start, sleep_end),
            out_of_home: away,
            initial_needs: PinnedNeeds {
                hunger: pinned.hunger,
                energy: pinned.energy,
                hygiene: pinned.hygiene,
                fun: pinned.fun,
            },
        })
    }
}

fn device(
    room: &str,
    name: &str,
    kind: DeviceKindConfig,
    power_watts: Option<f64>,
    flow: (Option<f64>, Option<f64>),
    max_uses_per_day: Option<u32>,
    typical: Option<[f64; 2]>,
) -> DeviceConfig {
    DeviceConfig {
        room: room.to_string(),
        name: name.to_string(),
        kind,
        power_watts,
        flow_liters_per_use: flow.0,
        flow_liters_per_minute: flow.1,
        max_uses_per_day,
        typical_duration_minutes: typical,
        hot_water: None,
    }
}

fn weekdays() -> Vec<String> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        .iter()
        .map(|d| (*d).to_string())
        .collect()
}

impl ScenarioConfig {
    /// Three-person household (two adults, one child) over one week.
    pub fn demo() -> Self {
        use DeviceKindConfig::{Electricity, Water};

        let devices = vec![
            device("Kitchen", "stove", Electricity, Some(2000.0), (None, None), Some(3), Some([20.0, 40.0])),
            device("Kitchen", "dishwasher", Electricity, Some(1800.0), (None, None), Some(2), Some([60.0, 90.0])),
            device("Bathroom", "sink", Water, None, (None, Some(6.0)), None, Some([1.0, 3.0])),
            device("Bathroom", "shower", Water, None, (None, Some(9.0)), Some(3), Some([5.0, 12.0])),
            device("Bathroom", "toilet", Water, None, (Some(6.0), None), Some(12), None),
            device("Living Room", "tv", Electricity, Some(150.0), (None, None), Some(4), Some([30.0, 90.0])),
            device("Living Room", "gaming_console", Electricity, Some(200.0), (None, None), Some(2), Some([30.0, 120.0])),
            device("Living Room", "vacuum_cleaner", Electricity, Some(1400.0), (None, None), Some(1), Some([15.0, 30.0])),
            device("Bedroom", "computer", Electricity, Some(120.0), (None, None), Some(4), Some([30.0, 120.0])),
        ];

        let npc = |name: &str, age_group, sleep: (&str, &str), away: (&str, &str, &str)| NpcConfig {
            name: name.to_string(),
            age_group,
            sleep_start: sleep.0.to_string(),
            sleep_end: sleep.1.to_string(),
            out_of_home: vec![OutOfHomeConfig {
                days: weekdays(),
                start: away.0.to_string(),
                end: away.1.to_string(),
                reason: away.2.to_string(),
            }],
            initial_needs: None,
        };

        Self {
            simulation: SimulationConfig::default(),
            house: HouseConfig::default(),
            ambient: AmbientConfig::default(),
            devices,
            npcs: vec![
                npc("John", AgeGroup::Adult, ("23:00", "07:00"), ("09:00", "17:00", "work")),
                npc("Jane", AgeGroup::Adult, ("22:30", "06:30"), ("08:00", "15:00", "work")),
                npc("Tim", AgeGroup::Child, ("21:00", "07:30"), ("08:30", "14:00", "school")),
            ],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "demo" => Ok(Self::demo()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario file, choosing JSON for `.json` paths and TOML otherwise.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid, has unknown fields,
    /// or lacks a required device/NPC field.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Parses a scenario from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the JSON is invalid or misses required fields.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::new("json", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Err(e) = self.simulation.to_sim_config() {
            errors.push(e);
        }

        let a = &self.ambient;
        if !(0.0..=100.0).contains(&a.humidity_percent) {
            errors.push(ConfigError::new("ambient.humidity_percent", "must be in [0, 100]"));
        }

        let h = &self.house;
        if !(0.0..=1.0).contains(&h.solar.panel_efficiency) {
            errors.push(ConfigError::new(
                "house.solar.panel_efficiency",
                "must be in [0.0, 1.0]",
            ));
        }
        if !(0.0..=100.0).contains(&h.battery.initial_state_of_charge_percent) {
            errors.push(ConfigError::new(
                "house.battery.initial_state_of_charge_percent",
                "must be in [0, 100]",
            ));
        }

        let mut seen_devices: Vec<DeviceKey> = Vec::new();
        for (i, d) in self.devices.iter().enumerate() {
            let path = format!("devices[{i}]");
            match d.to_spec(&path) {
                Ok(spec) => {
                    if seen_devices.contains(&spec.key) {
                        errors.push(ConfigError::new(
                            path,
                            format!("duplicate device \"{}\"", spec.key),
                        ));
                    } else {
                        seen_devices.push(spec.key);
                    }
                }
                Err(e) => errors.push(e),
            }
        }

        let mut seen_names: Vec<String> = Vec::new();
        for (i, n) in self.npcs.iter().enumerate() {
            let path = format!("npcs[{i}]");
            match n.to_profile(&path) {
                Ok(profile) => {
                    if seen_names.contains(&profile.name) {
                        errors.push(ConfigError::new(
                            format!("{path}.name"),
                            format!("duplicate NPC name \"{}\"", profile.name),
                        ));
                    } else {
                        seen_names.push(profile.name);
                    }
                }
                Err(e) => errors.push(e),
            }
        }

        errors
    }
}
