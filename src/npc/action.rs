//! Static catalog of the actions an occupant can perform.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::devices::DeviceKey;
use crate::house::House;
use crate::sim::rng::RandomSource;

use super::needs::{AgeGroup, NeedDeltas};

/// Fallback run length for device actions whose device has no typical range.
pub const DEFAULT_DEVICE_DURATION_SECS: f64 = 300.0;

/// Location of actions performed away from the house.
pub const OUTSIDE: &str = "Outside";

/// Identifier of a catalog action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionId {
    Cook,
    Eat,
    UseDishwasher,
    WashHands,
    BrushTeeth,
    Nap,
    Shower,
    WatchTv,
    PlayGames,
    GoForWalk,
    UseToilet,
    CallFriend,
    ReadBook,
    GoShopping,
    GoForJog,
    GoToGym,
    CleanHouse,
    Study,
    Overthink,
}

impl ActionId {
    pub const ALL: &[ActionId] = &[
        ActionId::Cook,
        ActionId::Eat,
        ActionId::UseDishwasher,
        ActionId::WashHands,
        ActionId::BrushTeeth,
        ActionId::Nap,
        ActionId::Shower,
        ActionId::WatchTv,
        ActionId::PlayGames,
        ActionId::GoForWalk,
        ActionId::UseToilet,
        ActionId::CallFriend,
        ActionId::ReadBook,
        ActionId::GoShopping,
        ActionId::GoForJog,
        ActionId::GoToGym,
        ActionId::CleanHouse,
        ActionId::Study,
        ActionId::Overthink,
    ];

    /// Snake-case name used in logs and exports.
    pub fn name(self) -> &'static str {
        match self {
            ActionId::Cook => "cook",
            ActionId::Eat => "eat",
            ActionId::UseDishwasher => "use_dishwasher",
            ActionId::WashHands => "wash_hands",
            ActionId::BrushTeeth => "brush_teeth",
            ActionId::Nap => "nap",
            ActionId::Shower => "shower",
            ActionId::WatchTv => "watch_tv",
            ActionId::PlayGames => "play_games",
            ActionId::GoForWalk => "go_for_walk",
            ActionId::UseToilet => "use_toilet",
            ActionId::CallFriend => "call_friend",
            ActionId::ReadBook => "read_book",
            ActionId::GoShopping => "go_shopping",
            ActionId::GoForJog => "go_for_jog",
            ActionId::GoToGym => "go_to_gym",
            ActionId::CleanHouse => "clean_house",
            ActionId::Study => "study",
            ActionId::Overthink => "overthink",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ActionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// How long an action lasts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionDuration {
    /// Constant length in seconds.
    Fixed(f64),
    /// Drawn from the device's typical range each time the action is chosen.
    FromDevice,
}

/// Immutable action template.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSpec {
    pub id: ActionId,
    pub duration: ActionDuration,
    /// Room the action happens in, or [`OUTSIDE`].
    pub location: &'static str,
    pub device: Option<&'static str>,
    pub deltas: NeedDeltas,
    pub allowed: &'static [AgeGroup],
    /// Follow-up queued when this action finishes.
    pub next: Option<ActionId>,
}

impl ActionSpec {
    pub fn allows(&self, age_group: AgeGroup) -> bool {
        self.allowed.contains(&age_group)
    }

    /// Key of the required device in this action's room.
    pub fn device_key(&self) -> Option<DeviceKey> {
        self.device.map(|d| DeviceKey::new(self.location, d))
    }
}

const MIN: f64 = 60.0;

const ALL_AGES: &[AgeGroup] = AgeGroup::ALL;
const GROWN_UPS: &[AgeGroup] = &[AgeGroup::Adult, AgeGroup::Elderly];
const ACTIVE: &[AgeGroup] = &[AgeGroup::Adult, AgeGroup::Teenager];
const NOT_CHILD: &[AgeGroup] = &[AgeGroup::Teenager, AgeGroup::Adult, AgeGroup::Elderly];

const fn spec(
    id: ActionId,
    duration: ActionDuration,
    location: &'static str,
    device: Option<&'static str>,
    deltas: NeedDeltas,
    allowed: &'static [AgeGroup],
    next: Option<ActionId>,
) -> ActionSpec {
    ActionSpec {
        id,
        duration,
        location,
        device,
        deltas,
        allowed,
        next,
    }
}

fn standard_actions() -> Vec<ActionSpec> {
    use ActionDuration::{FromDevice, Fixed};
    use ActionId::*;

    let d = NeedDeltas::new;
    vec![
        spec(Cook, FromDevice, "Kitchen", Some("stove"), d(0.0, -20.0, -25.0, 15.0), GROWN_UPS, Some(Eat)),
        spec(Eat, Fixed(20.0 * MIN), "Dining Room", None, d(-70.0, 20.0, -20.0, 20.0), ALL_AGES, Some(UseDishwasher)),
        spec(UseDishwasher, FromDevice, "Kitchen", Some("dishwasher"), d(0.0, -5.0, 7.0, -10.0), GROWN_UPS, Some(WashHands)),
        spec(WashHands, FromDevice, "Bathroom", Some("sink"), d(0.0, -2.0, 30.0, 0.0), ALL_AGES, Some(BrushTeeth)),
        spec(BrushTeeth, Fixed(5.0 * MIN), "Bathroom", Some("sink"), d(0.0, -5.0, 35.0, 0.0), ALL_AGES, None),
        spec(Nap, Fixed(30.0 * MIN), "Bedroom", None, d(20.0, 80.0, -15.0, 5.0), ALL_AGES, None),
        spec(Shower, FromDevice, "Bathroom", Some("shower"), d(0.0, 5.0, 55.0, 0.0), ALL_AGES, None),
        spec(WatchTv, FromDevice, "Living Room", Some("tv"), d(15.0, 5.0, -5.0, 35.0), ALL_AGES, None),
        spec(PlayGames, FromDevice, "Living Room", Some("gaming_console"), d(20.0, -20.0, -15.0, 30.0), ALL_AGES, None),
        spec(GoForWalk, Fixed(20.0 * MIN), OUTSIDE, None, d(35.0, -30.0, -15.0, 25.0), ALL_AGES, None),
        spec(UseToilet, Fixed(3.0 * MIN), "Bathroom", Some("toilet"), d(0.0, -1.0, 5.0, 0.0), ALL_AGES, None),
        spec(CallFriend, Fixed(5.0 * MIN), "Living Room", None, d(5.0, -5.0, 0.0, 10.0), ALL_AGES, None),
        spec(ReadBook, Fixed(15.0 * MIN), "Bedroom", None, d(10.0, -5.0, 0.0, 20.0), ALL_AGES, None),
        spec(GoShopping, Fixed(25.0 * MIN), OUTSIDE, None, d(5.0, -5.0, 0.0, 10.0), NOT_CHILD, None),
        spec(GoForJog, Fixed(20.0 * MIN), OUTSIDE, None, d(25.0, -20.0, -15.0, 25.0), ACTIVE, Some(Shower)),
        spec(GoToGym, Fixed(30.0 * MIN), OUTSIDE, None, d(30.0, -35.0, -20.0, 30.0), ACTIVE, Some(Shower)),
        spec(CleanHouse, FromDevice, "Living Room", Some("vacuum_cleaner"), d(20.0, -20.0, 20.0, -20.0), GROWN_UPS, None),
        spec(Study, FromDevice, "Bedroom", Some("computer"), d(15.0, -25.0, -10.0, -15.0), NOT_CHILD, None),
        spec(Overthink, Fixed(10.0 * MIN), "Bedroom", None, d(5.0, -10.0, 0.0, -10.0), GROWN_UPS, None),
    ]
}

/// Lookup table of action templates.
#[derive(Debug, Clone)]
pub struct ActionCatalog {
    actions: Vec<ActionSpec>,
}

impl ActionCatalog {
    /// Catalog of the given templates, looked up by id in order.
    pub fn new(actions: impl IntoIterator<Item = ActionSpec>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    /// The nineteen household actions.
    pub fn standard() -> Self {
        Self::new(standard_actions())
    }

    pub fn get(&self, id: ActionId) -> Option<&ActionSpec> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionSpec> {
        self.actions.iter()
    }

    /// Duration in seconds for one performance of `action`.
    ///
    /// Device-backed actions draw uniformly from the device's typical range
    /// (minutes), falling back to [`DEFAULT_DEVICE_DURATION_SECS`].
    pub fn duration_secs(&self, action: &ActionSpec, house: &House, rng: &mut dyn RandomSource) -> f64 {
        match action.duration {
            ActionDuration::Fixed(secs) => secs,
            ActionDuration::FromDevice => action
                .device_key()
                .and_then(|key| house.device(&key))
                .and_then(|spec| spec.typical_duration_minutes)
                .map_or(DEFAULT_DEVICE_DURATION_SECS, |(lo, hi)| rng.uniform(lo, hi) * MIN),
        }
    }
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::sim::rng::ScriptedRandom;

    fn catalog() -> ActionCatalog {
        ActionCatalog::standard()
    }

    #[test]
    fn every_id_has_one_template() {
        let c = catalog();
        for id in ActionId::ALL {
            assert_eq!(c.iter().filter(|a| a.id == *id).count(), 1, "{id}");
        }
    }

    #[test]
    fn cook_chain_order() {
        let c = catalog();
        let mut chain = vec![ActionId::Cook];
        let mut cur = ActionId::Cook;
        while let Some(next) = c.get(cur).and_then(|a| a.next) {
            chain.push(next);
            cur = next;
        }
        assert_eq!(
            chain,
            vec![
                ActionId::Cook,
                ActionId::Eat,
                ActionId::UseDishwasher,
                ActionId::WashHands,
                ActionId::BrushTeeth
            ]
        );
    }

    #[test]
    fn workouts_end_in_shower() {
        let c = catalog();
        assert_eq!(c.get(ActionId::GoForJog).and_then(|a| a.next), Some(ActionId::Shower));
        assert_eq!(c.get(ActionId::GoToGym).and_then(|a| a.next), Some(ActionId::Shower));
    }

    #[test]
    fn age_restrictions() {
        let c = catalog();
        let cook = c.get(ActionId::Cook);
        assert_eq!(cook.map(|a| a.allows(AgeGroup::Child)), Some(false));
        assert_eq!(cook.map(|a| a.allows(AgeGroup::Elderly)), Some(true));
        let jog = c.get(ActionId::GoForJog);
        assert_eq!(jog.map(|a| a.allows(AgeGroup::Elderly)), Some(false));
        assert_eq!(jog.map(|a| a.allows(AgeGroup::Teenager)), Some(true));
    }

    #[test]
    fn device_duration_drawn_from_range() {
        let house = House::from_config(&ScenarioConfig::demo()).ok();
        let Some(house) = house else {
            panic!("demo house should build");
        };
        let c = catalog();
        let Some(shower) = c.get(ActionId::Shower) else {
            panic!("shower missing");
        };
        // Demo shower runs 5-12 minutes.
        let mut rng = ScriptedRandom::new().with_reals([8.0]);
        assert_eq!(c.duration_secs(shower, &house, &mut rng), 480.0);
        let mut rng = ScriptedRandom::new();
        assert_eq!(c.duration_secs(shower, &house, &mut rng), 300.0);
    }

    #[test]
    fn device_without_range_uses_default() {
        let mut cfg = ScenarioConfig::demo();
        for d in &mut cfg.devices {
            d.typical_duration_minutes = None;
        }
        let Ok(house) = House::from_config(&cfg) else {
            panic!("house should build");
        };
        let c = catalog();
        let Some(tv) = c.get(ActionId::WatchTv) else {
            panic!("watch_tv missing");
        };
        let mut rng = ScriptedRandom::new().with_reals([40.0]);
        assert_eq!(c.duration_secs(tv, &house, &mut rng), DEFAULT_DEVICE_DURATION_SECS);
    }

    #[test]
    fn fixed_duration_ignores_rng() {
        let Ok(house) = House::from_config(&ScenarioConfig::demo()) else {
            panic!("house should build");
        };
        let c = catalog();
        let Some(eat) = c.get(ActionId::Eat) else {
            panic!("eat missing");
        };
        let mut rng = ScriptedRandom::new().with_reals([1.0]);
        assert_eq!(c.duration_secs(eat, &house, &mut rng), 1200.0);
    }
}
