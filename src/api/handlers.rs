//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ActionQuery, ErrorResponse, IntervalQuery, StateResponse};
use crate::sim::types::{ActionLogEntry, IntervalRecord};

/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        house: state.house.clone(),
        summary: state.summary.clone(),
        npcs: state.npcs.clone(),
        latest_interval: state.intervals.last().cloned(),
    })
}

/// Returns interval records, optionally filtered by index range.
///
/// `GET /intervals` → 200 + every record
/// `GET /intervals?from=N&to=M` → records N..=M
/// `GET /intervals?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_intervals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IntervalQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<IntervalRecord> = state
        .intervals
        .iter()
        .enumerate()
        .filter(|(i, _)| *i >= from && *i <= to)
        .map(|(_, r)| r.clone())
        .collect();

    Ok(Json(records))
}

/// Returns the action log, optionally for one occupant.
///
/// `GET /actions?npc=Jane` → 200 + Jane's entries; unknown names yield `[]`
pub async fn get_actions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActionQuery>,
) -> Json<Vec<ActionLogEntry>> {
    let entries = state
        .actions
        .iter()
        .filter(|a| query.npc.as_deref().is_none_or(|n| a.npc == n))
        .cloned()
        .collect();
    Json(entries)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::config::ScenarioConfig;
    use crate::environment::NoAmbient;
    use crate::io::RunLog;
    use crate::sim::Simulation;

    fn make_test_state() -> Arc<AppState> {
        let mut cfg = ScenarioConfig::demo();
        cfg.simulation.start_date = "2025-01-06".into();
        cfg.simulation.end_date = "2025-01-07".into();
        let mut sim = Simulation::seeded(&cfg, &NoAmbient).unwrap();
        let mut log = RunLog::new();
        let summary = sim.run(&mut log);
        Arc::new(AppState::from_run(&sim, summary, log))
    }

    async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(state);
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn state_returns_200() {
        let (status, json) = get_json(make_test_state(), "/state").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["house"]["name"], "Demo House");
        assert_eq!(json["summary"]["ticks"], 288);
        assert_eq!(json["npcs"].as_array().map(Vec::len), Some(3));
        assert!(json["latest_interval"].get("device_breakdown").is_some());
    }

    #[tokio::test]
    async fn intervals_returns_all_by_default() {
        let (status, json) = get_json(make_test_state(), "/intervals").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(288));
    }

    #[tokio::test]
    async fn intervals_range_is_inclusive() {
        let state = make_test_state();
        let expected = state.intervals[5].timestamp.to_rfc3339();
        let (status, json) = get_json(state, "/intervals?from=5&to=10").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["timestamp"], expected.as_str());
    }

    #[tokio::test]
    async fn intervals_inverted_range_returns_400() {
        let (status, json) = get_json(make_test_state(), "/intervals?from=10&to=5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("from"));
    }

    #[tokio::test]
    async fn actions_filter_by_npc() {
        let state = make_test_state();
        let (status, json) = get_json(state, "/actions?npc=Tim").await;
        assert_eq!(status, StatusCode::OK);
        let rows = json.as_array().unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r["npc"] == "Tim"));
    }

    #[tokio::test]
    async fn actions_unknown_npc_is_empty() {
        let (status, json) = get_json(make_test_state(), "/actions?npc=Nobody").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().map(Vec::len), Some(0));
    }
}
