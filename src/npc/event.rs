//! Transitions an occupant reports back to the driver each tick.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::devices::{DeviceKey, ResourceUsage};
use crate::house::AcquireError;

use super::action::ActionId;

/// Why an action could not start. The occupant stays idle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StartRefusal {
    #[error("{action} is not allowed for this age group")]
    AgeRestricted { action: ActionId },
    #[error("no {device} in this room")]
    DeviceMissing { device: DeviceKey },
    #[error(transparent)]
    DeviceUnavailable(#[from] AcquireError),
    #[error("{action} would run {duration_secs} s, past the representable calendar")]
    DurationOutOfRange { action: ActionId, duration_secs: f64 },
}

/// One state change of an occupant.
#[derive(Debug, Clone, PartialEq)]
pub enum NpcEvent {
    /// Outside the house for an out-of-home period.
    Away { reason: String },
    /// Entered the sleep window.
    FellAsleep,
    /// Still inside the sleep window.
    Asleep,
    /// Sleep window ended.
    WokeUp,
    Started {
        action: ActionId,
        device: Option<DeviceKey>,
        room: &'static str,
        duration_secs: f64,
    },
    /// Action completed; `usage` covers the whole action.
    Finished {
        action: ActionId,
        device: Option<DeviceKey>,
        usage: ResourceUsage,
        duration_secs: f64,
        started_at: DateTime<FixedOffset>,
    },
    Refused {
        action: ActionId,
        reason: StartRefusal,
    },
}

impl NpcEvent {
    /// Label written to the action log for zero-usage entries.
    pub fn label(&self) -> &str {
        match self {
            NpcEvent::Away { reason } => reason,
            NpcEvent::FellAsleep | NpcEvent::Asleep => "sleep",
            NpcEvent::WokeUp => "wake_up",
            NpcEvent::Started { action, .. }
            | NpcEvent::Finished { action, .. }
            | NpcEvent::Refused { action, .. } => action.name(),
        }
    }
}
