//! Shared household state: device occupancy, daily counters, and totals.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use thiserror::Error;

use crate::config::{ConfigError, HouseConfig, ScenarioConfig};
use crate::devices::{DeviceKey, DeviceRegistry, DeviceSpec, ResourceUsage};
use crate::environment::AmbientConditions;
use crate::npc::agent::NpcId;

/// Why a device could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    #[error("{device} is not installed")]
    UnknownDevice { device: DeviceKey },
    #[error("{device} is in use by {holder}")]
    InUse { device: DeviceKey, holder: NpcId },
    #[error("{device} reached its daily limit of {limit} uses")]
    DailyLimit { device: DeviceKey, limit: u32 },
}

/// Runtime state of one device instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceState {
    pub used_by: Option<NpcId>,
    pub uses_today: u32,
}

impl DeviceState {
    pub fn in_use(&self) -> bool {
        self.used_by.is_some()
    }
}

/// The dwelling and everything occupants contend for.
#[derive(Debug, Clone)]
pub struct House {
    profile: HouseConfig,
    ambient: AmbientConditions,
    registry: DeviceRegistry,
    states: HashMap<DeviceKey, DeviceState>,
    last_reset: Option<NaiveDate>,
    time: Option<DateTime<FixedOffset>>,
    totals: ResourceUsage,
}

impl House {
    pub fn new(profile: HouseConfig, registry: DeviceRegistry, ambient: AmbientConditions) -> Self {
        let states = registry
            .iter()
            .map(|d| (d.key.clone(), DeviceState::default()))
            .collect();
        Self {
            profile,
            ambient,
            registry,
            states,
            last_reset: None,
            time: None,
            totals: ResourceUsage::default(),
        }
    }

    /// Builds the house described by a scenario, using its `[ambient]` section.
    ///
    /// # Errors
    ///
    /// Returns the first device entry that fails to convert.
    pub fn from_config(cfg: &ScenarioConfig) -> Result<Self, ConfigError> {
        let specs = cfg
            .devices
            .iter()
            .enumerate()
            .map(|(i, d)| d.to_spec(&format!("devices[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;
        let ambient = AmbientConditions::from(&cfg.ambient);
        Ok(Self::new(cfg.house.clone(), DeviceRegistry::new(specs), ambient))
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn profile(&self) -> &HouseConfig {
        &self.profile
    }

    pub fn ambient(&self) -> AmbientConditions {
        self.ambient
    }

    pub fn set_ambient(&mut self, ambient: AmbientConditions) {
        self.ambient = ambient;
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Whether water heating runs on electricity.
    pub fn electric_heating(&self) -> bool {
        let m = self.profile.water_heating.method.trim();
        m.eq_ignore_ascii_case("electric") || m.eq_ignore_ascii_case("electricity")
    }

    pub fn time(&self) -> Option<DateTime<FixedOffset>> {
        self.time
    }

    pub fn set_time(&mut self, now: DateTime<FixedOffset>) {
        self.time = Some(now);
    }

    pub fn has_device(&self, key: &DeviceKey) -> bool {
        self.registry.contains(key)
    }

    pub fn device(&self, key: &DeviceKey) -> Option<&DeviceSpec> {
        self.registry.get(key)
    }

    pub fn state(&self, key: &DeviceKey) -> Option<&DeviceState> {
        self.states.get(key)
    }

    pub fn holder(&self, key: &DeviceKey) -> Option<NpcId> {
        self.states.get(key).and_then(|s| s.used_by)
    }

    pub fn uses_today(&self, key: &DeviceKey) -> u32 {
        self.states.get(key).map_or(0, |s| s.uses_today)
    }

    /// Reports why [`acquire`](Self::acquire) would fail, without changing anything.
    ///
    /// # Errors
    ///
    /// The same errors `acquire` returns.
    pub fn check_available(&self, key: &DeviceKey) -> Result<(), AcquireError> {
        let (Some(spec), Some(state)) = (self.registry.get(key), self.states.get(key)) else {
            return Err(AcquireError::UnknownDevice {
                device: key.clone(),
            });
        };
        if let Some(holder) = state.used_by {
            return Err(AcquireError::InUse {
                device: key.clone(),
                holder,
            });
        }
        match spec.max_uses_per_day {
            Some(limit) if state.uses_today >= limit => Err(AcquireError::DailyLimit {
                device: key.clone(),
                limit,
            }),
            _ => Ok(()),
        }
    }

    /// False if the device is unknown, in use, or out of uses for today.
    pub fn can_use(&self, key: &DeviceKey) -> bool {
        self.check_available(key).is_ok()
    }

    /// Marks the device in use by `npc` and counts one use.
    ///
    /// # Errors
    ///
    /// Leaves the house untouched and reports why when [`can_use`](Self::can_use)
    /// would be false.
    pub fn acquire(&mut self, key: &DeviceKey, npc: NpcId) -> Result<(), AcquireError> {
        self.check_available(key)?;
        if let Some(state) = self.states.get_mut(key) {
            state.used_by = Some(npc);
            state.uses_today += 1;
        }
        Ok(())
    }

    /// Frees the device. Releasing a free or unknown device is a no-op.
    pub fn release(&mut self, key: &DeviceKey) {
        if let Some(state) = self.states.get_mut(key) {
            state.used_by = None;
        }
    }

    /// Zeroes every daily counter when `date` differs from the last reset.
    ///
    /// Returns whether a reset happened.
    pub fn reset_daily_usage(&mut self, date: NaiveDate) -> bool {
        if self.last_reset == Some(date) {
            return false;
        }
        for state in self.states.values_mut() {
            state.uses_today = 0;
        }
        self.last_reset = Some(date);
        true
    }

    pub fn add_usage(&mut self, usage: ResourceUsage) {
        self.totals += usage;
    }

    pub fn totals(&self) -> ResourceUsage {
        self.totals
    }

    pub fn total_rooms(&self) -> u32 {
        let r = &self.profile.rooms;
        r.bedrooms + r.bathrooms + r.kitchen + r.living_room + r.dining_room + r.garage + r.garden
    }

    pub fn solar_area_m2(&self) -> f64 {
        let s = &self.profile.solar;
        f64::from(s.number_of_panels) * s.panel_size_m2
    }

    pub fn battery_capacity_kwh(&self) -> f64 {
        let b = &self.profile.battery;
        b.capacity_ah * b.voltage / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn demo_house() -> House {
        match House::from_config(&ScenarioConfig::demo()) {
            Ok(h) => h,
            Err(e) => panic!("demo house: {e}"),
        }
    }

    fn stove() -> DeviceKey {
        DeviceKey::new("Kitchen", "stove")
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn acquire_marks_holder_and_counts() {
        let mut h = demo_house();
        assert!(h.can_use(&stove()));
        assert_eq!(h.acquire(&stove(), NpcId(0)), Ok(()));
        assert_eq!(h.holder(&stove()), Some(NpcId(0)));
        assert_eq!(h.uses_today(&stove()), 1);
        assert!(!h.can_use(&stove()));
    }

    #[test]
    fn second_acquire_is_refused() {
        let mut h = demo_house();
        assert!(h.acquire(&stove(), NpcId(0)).is_ok());
        assert_eq!(
            h.acquire(&stove(), NpcId(1)),
            Err(AcquireError::InUse {
                device: stove(),
                holder: NpcId(0)
            })
        );
        assert_eq!(h.uses_today(&stove()), 1);
    }

    #[test]
    fn release_is_idempotent() {
        let mut h = demo_house();
        assert!(h.acquire(&stove(), NpcId(0)).is_ok());
        h.release(&stove());
        h.release(&stove());
        h.release(&DeviceKey::new("Garage", "drill"));
        assert_eq!(h.holder(&stove()), None);
        assert_eq!(h.uses_today(&stove()), 1);
    }

    #[test]
    fn unknown_device_in_other_room() {
        let mut h = demo_house();
        let key = DeviceKey::new("Kitchen", "shower");
        assert!(!h.has_device(&key));
        assert!(matches!(
            h.acquire(&key, NpcId(0)),
            Err(AcquireError::UnknownDevice { .. })
        ));
    }

    #[test]
    fn daily_limit_then_reset() {
        let mut h = demo_house();
        assert!(h.reset_daily_usage(date(6)));
        // Demo stove allows three uses per day.
        for _ in 0..3 {
            assert!(h.acquire(&stove(), NpcId(0)).is_ok());
            h.release(&stove());
        }
        assert!(matches!(
            h.acquire(&stove(), NpcId(0)),
            Err(AcquireError::DailyLimit { limit: 3, .. })
        ));
        assert!(!h.reset_daily_usage(date(6)));
        assert!(!h.can_use(&stove()));
        assert!(h.reset_daily_usage(date(7)));
        assert_eq!(h.uses_today(&stove()), 0);
        assert!(h.can_use(&stove()));
    }

    #[test]
    fn unlimited_device_never_hits_limit() {
        let mut h = demo_house();
        let sink = DeviceKey::new("Bathroom", "sink");
        for _ in 0..50 {
            assert!(h.acquire(&sink, NpcId(2)).is_ok());
            h.release(&sink);
        }
        assert_eq!(h.uses_today(&sink), 50);
    }

    #[test]
    fn informational_totals() {
        let h = demo_house();
        assert_eq!(h.total_rooms(), 6);
        assert!((h.solar_area_m2() - 13.6).abs() < 1e-9);
        assert!((h.battery_capacity_kwh() - 9.6).abs() < 1e-9);
        assert!(h.electric_heating());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Acquire(usize, usize),
        Release(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..3, 0usize..4).prop_map(|(d, n)| Op::Acquire(d, n)),
            (0usize..3).prop_map(Op::Release),
        ]
    }

    proptest! {
        #[test]
        fn at_most_one_holder(ops in prop::collection::vec(op(), 1..100)) {
            let keys = [stove(), DeviceKey::new("Bathroom", "shower"), DeviceKey::new("Bathroom", "sink")];
            let mut h = demo_house();
            let mut model: [Option<NpcId>; 3] = [None; 3];
            for op in ops {
                match op {
                    Op::Acquire(d, n) => {
                        let was_free = model[d].is_none();
                        let result = h.acquire(&keys[d], NpcId(n));
                        if result.is_ok() {
                            prop_assert!(was_free);
                            model[d] = Some(NpcId(n));
                        }
                    }
                    Op::Release(d) => {
                        h.release(&keys[d]);
                        model[d] = None;
                    }
                }
                for (i, key) in keys.iter().enumerate() {
                    prop_assert_eq!(h.holder(key), model[i]);
                }
            }
        }
    }
}
