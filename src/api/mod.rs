//! Read-only REST API over a finished run.
//!
//! Endpoints:
//! - `/state`: house facts, run summary, occupant snapshots, and the last interval
//! - `/intervals`: interval records with optional `from`/`to` index range
//! - `/actions`: action log with optional `npc` filter

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::io::RunLog;
use crate::sim::rng::RandomSource;
use crate::sim::summary::RunSummary;
use crate::sim::types::{ActionLogEntry, IntervalRecord};
use crate::sim::Simulation;

pub use types::{HouseInfo, NpcSnapshot};

/// Immutable application state shared across all request handlers.
///
/// Built once after the run and wrapped in `Arc`; no locks are needed.
pub struct AppState {
    pub house: HouseInfo,
    pub summary: RunSummary,
    pub npcs: Vec<NpcSnapshot>,
    pub intervals: Vec<IntervalRecord>,
    pub actions: Vec<ActionLogEntry>,
}

impl AppState {
    /// Captures the end state of `sim` together with its recorded output.
    pub fn from_run<R: RandomSource>(sim: &Simulation<R>, summary: RunSummary, log: RunLog) -> Self {
        let house = sim.house();
        Self {
            house: HouseInfo {
                name: house.name().to_string(),
                total_rooms: house.total_rooms(),
                water_heating: house.profile().water_heating.method.clone(),
                solar_area_m2: house.solar_area_m2(),
                battery_capacity_kwh: house.battery_capacity_kwh(),
                ambient: house.ambient(),
                devices: house.registry().iter().map(|d| d.key.to_string()).collect(),
            },
            summary,
            npcs: sim.npcs().iter().map(NpcSnapshot::from).collect(),
            intervals: log.intervals,
            actions: log.actions,
        }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/intervals", get(handlers::get_intervals))
        .route("/actions", get(handlers::get_actions))
        .with_state(state)
}

/// Binds to `addr` and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
