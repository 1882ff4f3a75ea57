//! Occupant agent: needs, schedule, and the per-tick behavior state machine.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::Serialize;

use crate::devices::DeviceKey;
use crate::house::House;
use crate::sim::rng::RandomSource;

use super::action::{ActionCatalog, ActionId, ActionSpec};
use super::event::{NpcEvent, StartRefusal};
use super::needs::{AgeGroup, NeedRates, Needs, PinnedNeeds};
use super::policy::DecisionPolicy;
use super::schedule::{OutOfHomePeriod, SleepWindow, away_reason};

/// Index of an occupant in configuration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NpcId(pub usize);

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "npc#{}", self.0)
    }
}

/// Static description of an occupant.
#[derive(Debug, Clone, PartialEq)]
pub struct NpcProfile {
    pub name: String,
    pub age_group: AgeGroup,
    pub sleep: SleepWindow,
    pub out_of_home: Vec<OutOfHomePeriod>,
    pub initial_needs: PinnedNeeds,
}

/// Behavior state of an occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    Idle,
    PerformingAction,
    Sleeping,
}

/// The action an occupant is currently performing.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveAction {
    pub action: ActionId,
    pub device: Option<DeviceKey>,
    pub room: &'static str,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub duration_secs: f64,
}

/// Shared, read-only inputs to one occupant tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    pub now: DateTime<FixedOffset>,
    pub catalog: &'a ActionCatalog,
    pub policy: &'a DecisionPolicy,
    pub rates: &'a NeedRates,
    pub toilet_interval: TimeDelta,
}

/// An autonomous household occupant.
#[derive(Debug, Clone)]
pub struct Npc {
    id: NpcId,
    profile: NpcProfile,
    needs: Needs,
    state: BehaviorState,
    current: Option<ActiveAction>,
    queue: VecDeque<ActionId>,
    last_toilet: Option<DateTime<FixedOffset>>,
    status: String,
}

impl Npc {
    /// Creates an idle occupant, sampling any needs the profile leaves unpinned.
    pub fn new(id: NpcId, profile: NpcProfile, rng: &mut dyn RandomSource) -> Self {
        let needs = Needs::sample(&profile.initial_needs, rng);
        Self {
            id,
            profile,
            needs,
            state: BehaviorState::Idle,
            current: None,
            queue: VecDeque::new(),
            last_toilet: None,
            status: "Idle".to_string(),
        }
    }

    pub fn id(&self) -> NpcId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn profile(&self) -> &NpcProfile {
        &self.profile
    }

    pub fn needs(&self) -> &Needs {
        &self.needs
    }

    pub fn state(&self) -> BehaviorState {
        self.state
    }

    pub fn current(&self) -> Option<&ActiveAction> {
        self.current.as_ref()
    }

    pub fn queue(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.queue.iter().copied()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Advances the occupant by one tick.
    ///
    /// Needs drift first, whatever the state. Then, in priority order: an
    /// out-of-home period suspends everything; an idle occupant inside its
    /// sleep window falls asleep; a finished action is wrapped up and the
    /// next one started in the same tick; a sleeper wakes once the window
    /// ends; an idle occupant decides what to do.
    pub fn tick(
        &mut self,
        ctx: &TickContext<'_>,
        house: &mut House,
        rng: &mut dyn RandomSource,
    ) -> Vec<NpcEvent> {
        let now = ctx.now;
        self.needs.drift(ctx.rates, house.ambient().temperature_celsius);
        self.check_toilet(now, ctx.toilet_interval);

        if let Some(reason) = away_reason(&self.profile.out_of_home, now) {
            self.status = format!("Away: {reason}");
            return vec![NpcEvent::Away {
                reason: reason.to_string(),
            }];
        }

        let asleep_now = self.profile.sleep.contains(now.time());
        let mut events = Vec::new();

        match self.state {
            BehaviorState::PerformingAction => {
                let due = self.current.as_ref().is_none_or(|a| now >= a.end);
                if !due {
                    return events;
                }
                if let Some(finished) = self.finish(ctx.catalog, house) {
                    events.push(finished);
                }
                if asleep_now {
                    self.fall_asleep(&mut events);
                } else {
                    self.decide_and_start(ctx, house, rng, &mut events);
                }
            }
            BehaviorState::Sleeping => {
                if asleep_now {
                    events.push(NpcEvent::Asleep);
                } else {
                    self.state = BehaviorState::Idle;
                    tracing::debug!(npc = %self.profile.name, %now, "woke up");
                    events.push(NpcEvent::WokeUp);
                    self.decide_and_start(ctx, house, rng, &mut events);
                }
            }
            BehaviorState::Idle => {
                if asleep_now {
                    self.fall_asleep(&mut events);
                } else {
                    self.decide_and_start(ctx, house, rng, &mut events);
                }
            }
        }
        events
    }

    fn check_toilet(&mut self, now: DateTime<FixedOffset>, interval: TimeDelta) {
        let Some(last) = self.last_toilet else {
            self.last_toilet = Some(now);
            return;
        };
        if now - last < interval {
            return;
        }
        self.last_toilet = Some(now);
        let busy_on_toilet = self
            .current
            .as_ref()
            .is_some_and(|a| a.action == ActionId::UseToilet);
        if !busy_on_toilet && !self.queue.contains(&ActionId::UseToilet) {
            self.queue.push_front(ActionId::UseToilet);
        }
    }

    fn fall_asleep(&mut self, events: &mut Vec<NpcEvent>) {
        self.state = BehaviorState::Sleeping;
        self.status = "Sleeping".to_string();
        tracing::debug!(npc = %self.profile.name, "fell asleep");
        events.push(NpcEvent::FellAsleep);
    }

    /// Applies the finished action's effects and frees its device.
    fn finish(&mut self, catalog: &ActionCatalog, house: &mut House) -> Option<NpcEvent> {
        self.state = BehaviorState::Idle;
        self.status = "Idle".to_string();
        let active = self.current.take()?;
        if let Some(key) = &active.device {
            house.release(key);
        }
        let spec = catalog.get(active.action)?;

        self.needs.apply(&spec.deltas);
        let usage = active
            .device
            .as_ref()
            .and_then(|key| house.device(key))
            .map(|d| d.usage_for_action(active.duration_secs, house.electric_heating()))
            .unwrap_or_default();
        if let Some(next) = spec.next {
            if !self.queue.contains(&next) {
                self.queue.push_front(next);
            }
        }

        tracing::trace!(npc = %self.profile.name, action = %active.action, "finished");
        Some(NpcEvent::Finished {
            action: active.action,
            device: active.device,
            usage,
            duration_secs: active.duration_secs,
            started_at: active.start,
        })
    }

    fn decide_and_start(
        &mut self,
        ctx: &TickContext<'_>,
        house: &mut House,
        rng: &mut dyn RandomSource,
        events: &mut Vec<NpcEvent>,
    ) {
        let action = match self.queue.pop_front() {
            Some(queued) => queued,
            None => {
                let Some(decision) = ctx.policy.decide(&self.needs, rng) else {
                    return;
                };
                if decision.chained {
                    self.queue_chain(ctx.catalog, decision.action);
                }
                decision.action
            }
        };
        let Some(spec) = ctx.catalog.get(action) else {
            return;
        };
        match self.try_start(spec, ctx, house, rng) {
            Ok(started) => events.push(started),
            Err(reason) => {
                self.status = format!("Cannot {action}: {reason}");
                tracing::trace!(npc = %self.profile.name, %action, %reason, "refused");
                events.push(NpcEvent::Refused { action, reason });
            }
        }
    }

    /// Replaces the queue with the links following `head`.
    fn queue_chain(&mut self, catalog: &ActionCatalog, head: ActionId) {
        self.queue.clear();
        let mut cur = head;
        while let Some(next) = catalog.get(cur).and_then(|a| a.next) {
            if self.queue.len() >= ActionId::ALL.len() {
                break;
            }
            self.queue.push_back(next);
            cur = next;
        }
    }

    fn try_start(
        &mut self,
        spec: &ActionSpec,
        ctx: &TickContext<'_>,
        house: &mut House,
        rng: &mut dyn RandomSource,
    ) -> Result<NpcEvent, StartRefusal> {
        if !spec.allows(self.profile.age_group) {
            return Err(StartRefusal::AgeRestricted { action: spec.id });
        }
        let device = spec.device_key();
        if let Some(key) = &device {
            if !house.has_device(key) {
                return Err(StartRefusal::DeviceMissing { device: key.clone() });
            }
            house.check_available(key)?;
        }

        // Whole milliseconds, so per-tick slices sum back to the full action.
        let duration_ms = (ctx.catalog.duration_secs(spec, house, rng) * 1000.0).round() as i64;
        let duration_secs = duration_ms as f64 / 1000.0;
        let start = ctx.now;
        let end = TimeDelta::try_milliseconds(duration_ms)
            .and_then(|d| start.checked_add_signed(d))
            .ok_or(StartRefusal::DurationOutOfRange {
                action: spec.id,
                duration_secs,
            })?;
        if let Some(key) = &device {
            house.acquire(key, self.id)?;
        }
        self.state = BehaviorState::PerformingAction;
        self.status = format!("Performing {} in {}", spec.id, spec.location);
        self.current = Some(ActiveAction {
            action: spec.id,
            device: device.clone(),
            room: spec.location,
            start,
            end,
            duration_secs,
        });

        tracing::trace!(npc = %self.profile.name, action = %spec.id, duration_secs, "started");
        Ok(NpcEvent::Started {
            action: spec.id,
            device,
            room: spec.location,
            duration_secs,
        })
    }
}
