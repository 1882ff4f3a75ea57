//! Device identity, descriptors, and resource-usage arithmetic.

use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Serialize, Serializer};

/// Energy needed to heat one liter of tap water by roughly 30 °C (kWh).
pub const ENERGY_PER_LITER_HOT_WATER: f64 = 0.0322;

/// Device names treated as hot-water fixtures when the config is silent.
pub const DEFAULT_HOT_WATER_FIXTURES: &[&str] = &["shower", "sink"];

/// Normalized room identifier (`"Living Room"` → `"living room"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized device identifier (`"Stove"` → `"stove"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite key identifying one physical device instance.
///
/// Two sinks in different rooms are different instances; the key never
/// collides the way a concatenated `"{room}_{device}"` string can.
///
/// # Examples
///
/// ```
/// use household_sim::devices::DeviceKey;
///
/// let key = DeviceKey::new("Kitchen", "Stove");
/// assert_eq!(key.to_string(), "kitchen/stove");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceKey {
    pub room: RoomId,
    pub device: DeviceId,
}

impl DeviceKey {
    pub fn new(room: &str, device: &str) -> Self {
        Self {
            room: RoomId::new(room),
            device: DeviceId::new(device),
        }
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.room, self.device)
    }
}

impl Serialize for DeviceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Whether a device is catalogued as a water or an electricity consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Water,
    Electricity,
}

/// How a water device draws water.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaterFlow {
    /// Flat volume per use (liters), e.g. a toilet flush.
    PerUse(f64),
    /// Continuous flow (liters per minute), e.g. a shower.
    PerMinute(f64),
}

/// Static descriptor of one device instance in the house.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSpec {
    pub key: DeviceKey,
    pub kind: DeviceKind,
    /// Electric draw while running (W). Zero for passive water fixtures.
    pub power_watts: f64,
    pub water_flow: Option<WaterFlow>,
    /// `None` means unlimited.
    pub max_uses_per_day: Option<u32>,
    /// Typical run length in minutes, `(min, max)`.
    pub typical_duration_minutes: Option<(f64, f64)>,
    pub hot_water: bool,
}

impl DeviceSpec {
    /// Resource usage for `active_secs` of an action that lasts `action_secs`.
    ///
    /// Electric draw and per-minute flow scale with active time. A flat
    /// per-use volume is spread over the action in proportion to
    /// `active_secs / action_secs`, so summing the slices of one action
    /// yields exactly one use. Heating energy is added for hot-water
    /// fixtures when `electric_heating` is set.
    ///
    /// # Examples
    ///
    /// ```
    /// use household_sim::devices::{
    ///     DeviceKey, DeviceKind, DeviceSpec, WaterFlow, ENERGY_PER_LITER_HOT_WATER,
    /// };
    ///
    /// let shower = DeviceSpec {
    ///     key: DeviceKey::new("Bathroom", "shower"),
    ///     kind: DeviceKind::Water,
    ///     power_watts: 0.0,
    ///     water_flow: Some(WaterFlow::PerMinute(8.0)),
    ///     max_uses_per_day: None,
    ///     typical_duration_minutes: Some((5.0, 10.0)),
    ///     hot_water: true,
    /// };
    /// let usage = shower.usage_for(300.0, 300.0, true);
    /// assert!((usage.water_liters - 40.0).abs() < 1e-9);
    /// assert!((usage.energy_kwh - 40.0 * ENERGY_PER_LITER_HOT_WATER).abs() < 1e-9);
    /// ```
    pub fn usage_for(&self, active_secs: f64, action_secs: f64, electric_heating: bool) -> ResourceUsage {
        let active_secs = active_secs.max(0.0);
        let mut energy_kwh = self.power_watts * (active_secs / 3600.0) / 1000.0;

        let water_liters = match self.water_flow {
            Some(WaterFlow::PerMinute(lpm)) => lpm * active_secs / 60.0,
            Some(WaterFlow::PerUse(liters)) if action_secs > 0.0 => {
                liters * (active_secs / action_secs).min(1.0)
            }
            Some(WaterFlow::PerUse(liters)) => liters,
            None => 0.0,
        };

        if self.hot_water && electric_heating {
            energy_kwh += water_liters * ENERGY_PER_LITER_HOT_WATER;
        }

        ResourceUsage {
            energy_kwh,
            water_liters,
        }
    }

    /// Usage of one complete action of `duration_secs`.
    pub fn usage_for_action(&self, duration_secs: f64, electric_heating: bool) -> ResourceUsage {
        self.usage_for(duration_secs, duration_secs, electric_heating)
    }
}

/// Electricity and water consumed over some span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ResourceUsage {
    pub energy_kwh: f64,
    pub water_liters: f64,
}

impl ResourceUsage {
    pub fn is_zero(&self) -> bool {
        self.energy_kwh == 0.0 && self.water_liters == 0.0
    }
}

impl Add for ResourceUsage {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            energy_kwh: self.energy_kwh + rhs.energy_kwh,
            water_liters: self.water_liters + rhs.water_liters,
        }
    }
}

impl AddAssign for ResourceUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.energy_kwh += rhs.energy_kwh;
        self.water_liters += rhs.water_liters;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stove() -> DeviceSpec {
        DeviceSpec {
            key: DeviceKey::new("Kitchen", "stove"),
            kind: DeviceKind::Electricity,
            power_watts: 2000.0,
            water_flow: None,
            max_uses_per_day: Some(3),
            typical_duration_minutes: Some((20.0, 40.0)),
            hot_water: false,
        }
    }

    fn toilet() -> DeviceSpec {
        DeviceSpec {
            key: DeviceKey::new("Bathroom", "toilet"),
            kind: DeviceKind::Water,
            power_watts: 0.0,
            water_flow: Some(WaterFlow::PerUse(6.0)),
            max_uses_per_day: Some(6),
            typical_duration_minutes: None,
            hot_water: false,
        }
    }

    #[test]
    fn keys_are_case_insensitive() {
        assert_eq!(
            DeviceKey::new("Living Room", "TV"),
            DeviceKey::new(" living room", "tv ")
        );
    }

    #[test]
    fn keys_do_not_collide_on_underscores() {
        // "a_b" + "c" vs "a" + "b_c" both concatenate to "a_b_c".
        assert_ne!(DeviceKey::new("a_b", "c"), DeviceKey::new("a", "b_c"));
    }

    #[test]
    fn electric_energy_scales_with_hours() {
        // 2 kW for 30 minutes = 1 kWh
        let usage = stove().usage_for_action(1800.0, true);
        assert!((usage.energy_kwh - 1.0).abs() < 1e-12);
        assert_eq!(usage.water_liters, 0.0);
    }

    #[test]
    fn per_use_water_spreads_over_action() {
        let t = toilet();
        let first = t.usage_for(120.0, 180.0, false);
        let rest = t.usage_for(60.0, 180.0, false);
        assert!((first.water_liters + rest.water_liters - 6.0).abs() < 1e-12);
    }

    #[test]
    fn cold_fixture_never_heats() {
        let usage = toilet().usage_for_action(180.0, true);
        assert_eq!(usage.energy_kwh, 0.0);
    }

    #[test]
    fn electric_shower_adds_power_and_heating() {
        let shower = DeviceSpec {
            key: DeviceKey::new("Bathroom", "shower"),
            kind: DeviceKind::Water,
            power_watts: 1200.0,
            water_flow: Some(WaterFlow::PerMinute(8.0)),
            max_uses_per_day: None,
            typical_duration_minutes: None,
            hot_water: true,
        };
        let usage = shower.usage_for_action(300.0, true);
        let expected = 40.0 * ENERGY_PER_LITER_HOT_WATER + 1200.0 * (300.0 / 3600.0) / 1000.0;
        assert!((usage.energy_kwh - expected).abs() < 1e-12);
    }

    #[test]
    fn gas_heating_skips_surcharge() {
        let shower = DeviceSpec {
            key: DeviceKey::new("Bathroom", "shower"),
            kind: DeviceKind::Water,
            power_watts: 0.0,
            water_flow: Some(WaterFlow::PerMinute(8.0)),
            max_uses_per_day: None,
            typical_duration_minutes: None,
            hot_water: true,
        };
        let usage = shower.usage_for_action(300.0, false);
        assert_eq!(usage.energy_kwh, 0.0);
        assert!((usage.water_liters - 40.0).abs() < 1e-12);
    }
}
