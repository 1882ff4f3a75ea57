/// Simulation clock over simulated timestamps.
pub mod clock;
pub mod engine;
/// Hourly rollup of interval records.
pub mod hourly;
pub mod rng;
pub mod summary;
pub mod types;

pub use engine::{Simulation, StopFlag};
pub use summary::RunSummary;
pub use types::{ActionLogEntry, IntervalRecord, SimConfig};
