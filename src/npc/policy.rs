//! Ordered need-threshold rules that pick the next action.

use crate::sim::rng::RandomSource;

use super::action::ActionId;
use super::needs::Needs;

/// What a matching rule yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// A single action.
    One(ActionId),
    /// The head of a chain; the remaining links are queued up front.
    Chain(ActionId),
    /// Uniform choice among alternatives.
    AnyOf(&'static [ActionId]),
}

/// One row of the decision cascade.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&Needs) -> bool,
    pub select: Selection,
}

/// A policy decision: the action to start and any chain links to queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub rule: &'static str,
    pub action: ActionId,
    pub chained: bool,
}

/// First-match-wins list of [`Rule`]s.
///
/// The queued follow-up and toilet checks live in the agent since they
/// depend on its queue and timer rather than on needs alone.
#[derive(Debug, Clone)]
pub struct DecisionPolicy {
    rules: Vec<Rule>,
}

const FUN_ACTIONS: &[ActionId] = &[ActionId::WatchTv, ActionId::PlayGames];
const WORKOUTS: &[ActionId] = &[ActionId::GoForJog, ActionId::GoToGym];
const CHORES: &[ActionId] = &[ActionId::CleanHouse, ActionId::Study, ActionId::Overthink];
const PASTIMES: &[ActionId] = &[ActionId::CallFriend, ActionId::ReadBook, ActionId::GoShopping];

impl DecisionPolicy {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The household cascade, most urgent need first.
    pub fn standard() -> Self {
        Self::new(vec![
            Rule {
                name: "exhausted",
                applies: |n| n.energy < 20.0,
                select: Selection::One(ActionId::Nap),
            },
            Rule {
                name: "hungry",
                applies: |n| n.hunger > 60.0,
                select: Selection::Chain(ActionId::Cook),
            },
            Rule {
                name: "dirty",
                applies: |n| n.hygiene < 60.0,
                select: Selection::One(ActionId::Shower),
            },
            Rule {
                name: "bored",
                applies: |n| n.fun < 30.0,
                select: Selection::AnyOf(FUN_ACTIONS),
            },
            Rule {
                name: "restless",
                applies: |n| n.energy > 80.0,
                select: Selection::AnyOf(WORKOUTS),
            },
            Rule {
                name: "content",
                applies: |n| n.fun > 70.0,
                select: Selection::AnyOf(CHORES),
            },
            Rule {
                name: "idle",
                applies: |_| true,
                select: Selection::AnyOf(PASTIMES),
            },
        ])
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Picks an action for `needs`, or `None` if no rule applies.
    pub fn decide(&self, needs: &Needs, rng: &mut dyn RandomSource) -> Option<Decision> {
        let rule = self.rules.iter().find(|r| (r.applies)(needs))?;
        let (action, chained) = match rule.select {
            Selection::One(a) => (a, false),
            Selection::Chain(a) => (a, true),
            Selection::AnyOf(options) => (*options.get(rng.pick(options.len()))?, false),
        };
        Some(Decision {
            rule: rule.name,
            action,
            chained,
        })
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
