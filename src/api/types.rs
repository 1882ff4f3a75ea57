//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::environment::AmbientConditions;
use crate::npc::{AgeGroup, BehaviorState, Needs, Npc};
use crate::sim::summary::RunSummary;
use crate::sim::types::IntervalRecord;

/// Static facts about the simulated dwelling.
#[derive(Debug, Clone, Serialize)]
pub struct HouseInfo {
    pub name: String,
    pub total_rooms: u32,
    pub water_heating: String,
    pub solar_area_m2: f64,
    pub battery_capacity_kwh: f64,
    pub ambient: AmbientConditions,
    /// Installed devices as `room/device` keys, in contention order.
    pub devices: Vec<String>,
}

/// Occupant state at the end of the run.
#[derive(Debug, Clone, Serialize)]
pub struct NpcSnapshot {
    pub name: String,
    pub age_group: AgeGroup,
    pub state: BehaviorState,
    pub status: String,
    pub needs: Needs,
    /// Worded needs, e.g. `"Hungry, Energetic, Clean, Bored"`.
    pub mood: String,
    pub current_action: Option<String>,
    pub queued: Vec<String>,
}

impl From<&Npc> for NpcSnapshot {
    fn from(npc: &Npc) -> Self {
        Self {
            name: npc.name().to_string(),
            age_group: npc.profile().age_group,
            state: npc.state(),
            status: npc.status().to_string(),
            needs: *npc.needs(),
            mood: npc.needs().describe(),
            current_action: npc.current().map(|a| a.action.name().to_string()),
            queued: npc.queue().map(|a| a.name().to_string()).collect(),
        }
    }
}

/// `GET /state` body.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub house: HouseInfo,
    pub summary: RunSummary,
    pub npcs: Vec<NpcSnapshot>,
    /// Last interval of the run, `null` for an empty run.
    pub latest_interval: Option<IntervalRecord>,
}

/// Inclusive interval index range for `GET /intervals`.
#[derive(Debug, Deserialize)]
pub struct IntervalQuery {
    pub from: Option<usize>,
    pub to: Option<usize>,
}

/// Optional occupant filter for `GET /actions`.
#[derive(Debug, Deserialize)]
pub struct ActionQuery {
    pub npc: Option<String>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
