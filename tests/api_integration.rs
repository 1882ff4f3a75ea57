//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use household_sim::api::{AppState, router};

fn build_api_state() -> Arc<AppState> {
    let (sim, log, summary) = common::run(&common::scenario_file("couple.toml"));
    Arc::new(AppState::from_run(&sim, summary, log))
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn state_describes_house_and_occupants() {
    let (status, json) = get(build_api_state(), "/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["house"]["name"], "Riverside Flat");
    assert_eq!(json["house"]["water_heating"], "gas");
    assert_eq!(json["house"]["devices"].as_array().map(Vec::len), Some(6));
    assert_eq!(json["summary"]["completed"], true);
    let names: Vec<_> = json["npcs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, ["Mara", "Olu"]);
    for npc in json["npcs"].as_array().unwrap() {
        for need in ["hunger", "energy", "hygiene", "fun"] {
            let v = npc["needs"][need].as_f64().unwrap();
            assert!((0.0..=100.0).contains(&v));
        }
    }
}

#[tokio::test]
async fn interval_totals_match_summary() {
    let state = build_api_state();
    let expected = state.summary.total_electricity_kwh;
    let (status, json) = get(state, "/intervals").await;
    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 288);
    let sum: f64 = rows
        .iter()
        .map(|r| r["electricity_kwh"].as_f64().unwrap())
        .sum();
    assert!((sum - expected).abs() < 1e-9);
}

#[tokio::test]
async fn interval_range_and_validation() {
    let state = build_api_state();
    let (status, json) = get(state.clone(), "/intervals?from=12&to=23").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(12));

    let (status, json) = get(state.clone(), "/intervals?from=280").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(Vec::len), Some(8));

    let (status, _) = get(state, "/intervals?from=5&to=4").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn actions_filtered_per_occupant() {
    let state = build_api_state();
    let total = state.actions.len();
    let (_, mara) = get(state.clone(), "/actions?npc=Mara").await;
    let (_, olu) = get(state, "/actions?npc=Olu").await;
    let mara = mara.as_array().unwrap();
    let olu = olu.as_array().unwrap();
    assert!(mara.iter().all(|a| a["npc"] == "Mara"));
    assert!(olu.iter().any(|a| a["action"] == "choir"));
    assert_eq!(mara.len() + olu.len(), total);
}
