use crate::sim::types::SimConfig;

use super::types::ResourceUsage;

/// Scales a per-5-minute quantity to a tick of `tick_minutes`.
///
/// The tick ratio is taken first so a 5-minute tick returns the input
/// unchanged.
pub fn per_tick_from_per_5min(per_5min: f64, tick_minutes: u32) -> f64 {
    per_5min * (f64::from(tick_minutes) / 5.0)
}

/// Always-on electricity draw (fridge, router, standby devices).
///
/// `BaseLoad` contributes the same energy to every interval regardless of
/// occupant activity, so a house with nobody home still reports a load.
///
/// # Examples
///
/// ```
/// use household_sim::devices::baseload::BaseLoad;
///
/// // 0.007 kWh per 5 minutes at a 15-minute tick
/// let load = BaseLoad::from_per_5min(0.007, 15);
/// assert!((load.usage().energy_kwh - 0.021).abs() < 1e-12);
/// assert_eq!(load.usage().water_liters, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseLoad {
    /// Energy drawn per tick in kilowatt-hours.
    pub kwh_per_tick: f64,
}

impl BaseLoad {
    /// Creates a baseline load drawing `kwh_per_tick` every tick.
    pub fn new(kwh_per_tick: f64) -> Self {
        Self {
            kwh_per_tick: kwh_per_tick.max(0.0),
        }
    }

    /// Scales a per-5-minute draw linearly to the tick length.
    pub fn from_per_5min(kwh_per_5min: f64, tick_minutes: u32) -> Self {
        Self::new(per_tick_from_per_5min(kwh_per_5min, tick_minutes))
    }

    /// Baseline taken from the driver configuration.
    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.baseline_kwh_per_tick)
    }

    /// Usage contributed to one interval.
    pub fn usage(&self) -> ResourceUsage {
        ResourceUsage {
            energy_kwh: self.kwh_per_tick,
            water_liters: 0.0,
        }
    }

    /// Average power in kilowatts for a tick of `tick_minutes`.
    pub fn power_kw(&self, tick_minutes: u32) -> f64 {
        if tick_minutes == 0 {
            return 0.0;
        }
        self.kwh_per_tick * 60.0 / f64::from(tick_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_household_draw() {
        let load = BaseLoad::from_per_5min(0.007, 5);
        assert!((load.usage().energy_kwh - 0.007).abs() < 1e-12);
        // 0.007 kWh over 5 minutes = 84 W
        assert!((load.power_kw(5) - 0.084).abs() < 1e-12);
    }

    #[test]
    fn five_minute_tick_keeps_configured_draw_exactly() {
        assert_eq!(BaseLoad::from_per_5min(0.007, 5).kwh_per_tick, 0.007);
        assert_eq!(per_tick_from_per_5min(0.007, 5), 0.007);
        assert!((per_tick_from_per_5min(0.007, 60) - 0.084).abs() < 1e-12);
    }

    #[test]
    fn negative_draw_is_clamped() {
        assert_eq!(BaseLoad::new(-1.0).kwh_per_tick, 0.0);
    }

    #[test]
    fn zero_tick_has_no_power() {
        assert_eq!(BaseLoad::new(0.5).power_kw(0), 0.0);
    }
}
