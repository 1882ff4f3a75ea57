//! Run output: sinks receiving records during the run and file exporters.

pub mod export;
pub mod sink;

pub use sink::{Discard, OutputSink, RunLog};
