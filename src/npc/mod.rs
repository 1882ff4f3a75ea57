//! Household occupants and the needs-driven behavior loop.

pub mod action;
pub mod agent;
/// Occupant state transitions reported to the driver.
pub mod event;
pub mod needs;
pub mod policy;
/// Sleep and out-of-home windows.
pub mod schedule;

pub use action::{ActionCatalog, ActionId, ActionSpec};
pub use agent::{BehaviorState, Npc, NpcId, NpcProfile, TickContext};
pub use event::{NpcEvent, StartRefusal};
pub use needs::{AgeGroup, Needs};
pub use policy::DecisionPolicy;
