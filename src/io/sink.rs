//! Destinations for interval records and action log entries.

use crate::sim::types::{ActionLogEntry, IntervalRecord};

/// Receives everything the driver emits, in emission order.
pub trait OutputSink {
    fn record_interval(&mut self, record: &IntervalRecord);
    fn record_action(&mut self, entry: &ActionLogEntry);
}

/// In-memory sink keeping the full run.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    pub intervals: Vec<IntervalRecord>,
    pub actions: Vec<ActionLogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log entries of one occupant.
    pub fn actions_of<'a>(&'a self, npc: &'a str) -> impl Iterator<Item = &'a ActionLogEntry> + 'a {
        self.actions.iter().filter(move |a| a.npc == npc)
    }
}

impl OutputSink for RunLog {
    fn record_interval(&mut self, record: &IntervalRecord) {
        self.intervals.push(record.clone());
    }

    fn record_action(&mut self, entry: &ActionLogEntry) {
        self.actions.push(entry.clone());
    }
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl OutputSink for Discard {
    fn record_interval(&mut self, _: &IntervalRecord) {}
    fn record_action(&mut self, _: &ActionLogEntry) {}
}
