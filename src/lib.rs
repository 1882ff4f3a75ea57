//! Agent-based household simulator: occupants with needs contend for devices
//! while the driver meters electricity and water per interval.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod devices;
pub mod environment;
pub mod error;
pub mod house;
pub mod io;
pub mod npc;
/// Simulation driver, clock, randomness, and run records.
pub mod sim;
