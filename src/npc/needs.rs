//! Occupant age groups and the four-need vector driving behavior.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::rng::RandomSource;

/// Lower bound of every need.
pub const NEED_MIN: f64 = 0.0;
/// Upper bound of every need.
pub const NEED_MAX: f64 = 100.0;
/// Indoor temperature an occupant is comfortable at (°C).
pub const COMFORT_TEMPERATURE_C: f64 = 22.0;
/// Temperature gap (°C) tolerated before comfort drains energy and fun.
const COMFORT_BAND_C: f64 = 5.0;

/// Age bracket gating which actions an occupant may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Child,
    Teenager,
    Adult,
    Elderly,
}

impl AgeGroup {
    pub const ALL: &[AgeGroup] = &[
        AgeGroup::Child,
        AgeGroup::Teenager,
        AgeGroup::Adult,
        AgeGroup::Elderly,
    ];
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgeGroup::Child => "child",
            AgeGroup::Teenager => "teenager",
            AgeGroup::Adult => "adult",
            AgeGroup::Elderly => "elderly",
        };
        f.write_str(s)
    }
}

/// Signed change to each need applied when an action finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NeedDeltas {
    pub hunger: f64,
    pub energy: f64,
    pub hygiene: f64,
    pub fun: f64,
}

impl NeedDeltas {
    pub const fn new(hunger: f64, energy: f64, hygiene: f64, fun: f64) -> Self {
        Self {
            hunger,
            energy,
            hygiene,
            fun,
        }
    }
}

/// Per-tick drift of each need. Hunger grows, the others decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeedRates {
    pub hunger_gain: f64,
    pub energy_loss: f64,
    pub hygiene_loss: f64,
    pub fun_loss: f64,
}

impl Default for NeedRates {
    fn default() -> Self {
        Self {
            hunger_gain: 0.5,
            energy_loss: 0.3,
            hygiene_loss: 0.7,
            fun_loss: 0.4,
        }
    }
}

/// Starting needs fixed by configuration; `None` entries are sampled.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PinnedNeeds {
    pub hunger: Option<f64>,
    pub energy: Option<f64>,
    pub hygiene: Option<f64>,
    pub fun: Option<f64>,
}

impl PinnedNeeds {
    /// Pins every need to the given values.
    pub fn all(needs: Needs) -> Self {
        Self {
            hunger: Some(needs.hunger),
            energy: Some(needs.energy),
            hygiene: Some(needs.hygiene),
            fun: Some(needs.fun),
        }
    }
}

/// Hunger, energy, hygiene and fun, each kept within `[0, 100]`.
///
/// # Examples
///
/// ```
/// use household_sim::npc::needs::{NeedDeltas, Needs};
///
/// let mut needs = Needs::new(95.0, 10.0, 50.0, 50.0);
/// needs.apply(&NeedDeltas::new(20.0, -30.0, 0.0, 0.0));
/// assert_eq!(needs.hunger, 100.0);
/// assert_eq!(needs.energy, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Needs {
    pub hunger: f64,
    pub energy: f64,
    pub hygiene: f64,
    pub fun: f64,
}

fn clamp(v: f64) -> f64 {
    v.clamp(NEED_MIN, NEED_MAX)
}

impl Needs {
    /// Creates a need vector, clamping each value into range.
    pub fn new(hunger: f64, energy: f64, hygiene: f64, fun: f64) -> Self {
        Self {
            hunger: clamp(hunger),
            energy: clamp(energy),
            hygiene: clamp(hygiene),
            fun: clamp(fun),
        }
    }

    /// Samples unpinned needs as whole numbers in `[0, 100]`.
    pub fn sample(pinned: &PinnedNeeds, rng: &mut dyn RandomSource) -> Self {
        let mut pick = |p: Option<f64>| p.unwrap_or_else(|| rng.pick(101) as f64);
        let hunger = pick(pinned.hunger);
        let energy = pick(pinned.energy);
        let hygiene = pick(pinned.hygiene);
        let fun = pick(pinned.fun);
        Self::new(hunger, energy, hygiene, fun)
    }

    /// Applies action deltas, clamping every need to `[0, 100]`.
    pub fn apply(&mut self, deltas: &NeedDeltas) {
        self.hunger = clamp(self.hunger + deltas.hunger);
        self.energy = clamp(self.energy + deltas.energy);
        self.hygiene = clamp(self.hygiene + deltas.hygiene);
        self.fun = clamp(self.fun + deltas.fun);
    }

    /// Advances the needs by one tick.
    ///
    /// Besides the fixed drift, an indoor temperature more than 5 °C away
    /// from [`COMFORT_TEMPERATURE_C`] costs `⌊gap / 5⌋` energy and fun.
    pub fn drift(&mut self, rates: &NeedRates, indoor_temperature_c: f64) {
        self.hunger = clamp(self.hunger + rates.hunger_gain);
        self.energy = clamp(self.energy - rates.energy_loss);
        self.hygiene = clamp(self.hygiene - rates.hygiene_loss);
        self.fun = clamp(self.fun - rates.fun_loss);

        let gap = (indoor_temperature_c.trunc() - COMFORT_TEMPERATURE_C).abs();
        if gap > COMFORT_BAND_C {
            let penalty = (gap / COMFORT_BAND_C).floor();
            self.energy = clamp(self.energy - penalty);
            self.fun = clamp(self.fun - penalty);
        }
    }

    /// Short qualitative summary, e.g. `"Hungry, Tired, Clean, Bored"`.
    pub fn describe(&self) -> String {
        let hunger = if self.hunger > 70.0 {
            "Very Hungry"
        } else if self.hunger > 50.0 {
            "Hungry"
        } else {
            "Not Hungry"
        };
        let energy = if self.energy < 20.0 {
            "Exhausted"
        } else if self.energy < 50.0 {
            "Tired"
        } else {
            "Energetic"
        };
        let hygiene = if self.hygiene < 30.0 { "Dirty" } else { "Clean" };
        let fun = if self.fun < 30.0 { "Bored" } else { "Having Fun" };
        format!("{hunger}, {energy}, {hygiene}, {fun}")
    }
}

impl fmt::Display for Needs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hunger={:.1} energy={:.1} hygiene={:.1} fun={:.1}",
            self.hunger, self.energy, self.hygiene, self.fun
        )
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::sim::rng::ScriptedRandom;

    fn in_range(n: &Needs) -> bool {
        [n.hunger, n.energy, n.hygiene, n.fun]
            .iter()
            .all(|v| (NEED_MIN..=NEED_MAX).contains(v))
    }

    #[test]
    fn drift_moves_each_need_by_its_rate() {
        let mut n = Needs::new(50.0, 50.0, 50.0, 50.0);
        n.drift(&NeedRates::default(), COMFORT_TEMPERATURE_C);
        assert!((n.hunger - 50.5).abs() < 1e-12);
        assert!((n.energy - 49.7).abs() < 1e-12);
        assert!((n.hygiene - 49.3).abs() < 1e-12);
        assert!((n.fun - 49.6).abs() < 1e-12);
    }

    #[test]
    fn cold_house_drains_energy_and_fun() {
        let mut warm = Needs::new(50.0, 50.0, 50.0, 50.0);
        let mut cold = warm;
        warm.drift(&NeedRates::default(), 22.0);
        // 22 - 10 = 12 degrees off, floor(12 / 5) = 2
        cold.drift(&NeedRates::default(), 10.0);
        assert!((warm.energy - cold.energy - 2.0).abs() < 1e-12);
        assert!((warm.fun - cold.fun - 2.0).abs() < 1e-12);
        assert_eq!(warm.hunger, cold.hunger);
    }

    #[test]
    fn sample_respects_pins() {
        let mut rng = ScriptedRandom::new().with_picks([10, 20]);
        let pinned = PinnedNeeds {
            hunger: Some(70.0),
            fun: Some(5.0),
            ..PinnedNeeds::default()
        };
        let n = Needs::sample(&pinned, &mut rng);
        assert_eq!(n.hunger, 70.0);
        assert_eq!(n.energy, 10.0);
        assert_eq!(n.hygiene, 20.0);
        assert_eq!(n.fun, 5.0);
    }

    #[test]
    fn describe_thresholds() {
        let n = Needs::new(80.0, 10.0, 20.0, 90.0);
        assert_eq!(n.describe(), "Very Hungry, Exhausted, Dirty, Having Fun");
    }

    proptest! {
        #[test]
        fn apply_never_leaves_range(
            start in prop::array::uniform4(0.0f64..=100.0),
            deltas in prop::collection::vec(prop::array::uniform4(-150.0f64..150.0), 1..40),
        ) {
            let mut n = Needs::new(start[0], start[1], start[2], start[3]);
            for d in deltas {
                n.apply(&NeedDeltas::new(d[0], d[1], d[2], d[3]));
                prop_assert!(in_range(&n));
            }
        }

        #[test]
        fn drift_never_leaves_range(
            start in prop::array::uniform4(0.0f64..=100.0),
            ticks in 0usize..500,
            temp in -20.0f64..50.0,
        ) {
            let mut n = Needs::new(start[0], start[1], start[2], start[3]);
            for _ in 0..ticks {
                n.drift(&NeedRates::default(), temp);
            }
            prop_assert!(in_range(&n));
        }
    }
}
