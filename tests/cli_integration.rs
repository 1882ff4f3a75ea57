//! Runs the binary against the shipped scenarios.

use std::path::PathBuf;
use std::process::Command;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("household-sim-{}-{name}", std::process::id()))
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_household-sim"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(args)
        .output()
        .expect("household-sim process should run")
}

#[test]
fn scenario_run_prints_summary_and_writes_exports() {
    let intervals = temp_path("intervals.csv");
    let hourly = temp_path("hourly.csv");
    let actions = temp_path("actions.json");
    let output = run_cli(&[
        "--scenario",
        "scenarios/couple.toml",
        "--intervals-out",
        intervals.to_str().unwrap(),
        "--hourly-out",
        hourly.to_str().unwrap(),
        "--actions-out",
        actions.to_str().unwrap(),
    ]);

    assert!(
        output.status.success(),
        "run failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    assert!(stdout.contains("--- Run Summary ---"));
    assert!(stdout.contains("Intervals:             288"));
    assert!(stdout.contains("Mara"));

    let csv = std::fs::read_to_string(&intervals).expect("interval CSV written");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("timestamp,electricity_kwh,water_liters"));
    assert_eq!(lines.count(), 288);

    let hourly_csv = std::fs::read_to_string(&hourly).expect("hourly CSV written");
    assert_eq!(hourly_csv.lines().count(), 25);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&actions).expect("action log written"))
            .expect("action log is JSON");
    assert_eq!(report["house_name"], "Riverside Flat");
    assert_eq!(report["total_time"], "1 days 00:00:00");
    assert_eq!(report["type_of_simulation"], "fast_forward");
    assert!(report["actions"].as_array().is_some_and(|a| !a.is_empty()));

    for p in [intervals, hourly, actions] {
        let _ = std::fs::remove_file(p);
    }
}

#[test]
fn same_seed_gives_identical_output() {
    let a = run_cli(&["--preset", "demo", "--start", "2025-01-06", "--end", "2025-01-07", "--seed", "9"]);
    let b = run_cli(&["--preset", "demo", "--start", "2025-01-06", "--end", "2025-01-07", "--seed", "9"]);
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
}

#[test]
fn invalid_override_reports_field_and_fails() {
    let output = run_cli(&["--preset", "demo", "--start", "2025-13-40"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("simulation.start_date"), "stderr={stderr}");
}

#[test]
fn unknown_flag_fails() {
    let output = run_cli(&["--telemetry-out", "x.csv"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown argument"));
}
