//! Integration tests for the `fleetview` binary.
//!
//! Every command is driven from files in a temporary directory; nothing
//! here touches the network. `route` is only exercised on inputs that are
//! resolved without calling the routing provider.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Run the CLI inside `dir`, with a config file that keeps logs there too.
fn run_cli(dir: &Path, args: &[&str]) -> Output {
    let config = dir.join("config.ini");
    if !config.exists() {
        fs::write(
            &config,
            format!(
                "[logging]\ndirectory = {}\n",
                dir.join("logs").to_string_lossy()
            ),
        )
        .expect("Failed to write test config");
    }

    Command::new(env!("CARGO_BIN_EXE_fleetview"))
        .current_dir(dir)
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("Failed to execute CLI command")
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Assert a command succeeded.
fn assert_success(output: &Output, context: &str) {
    if !output.status.success() {
        panic!(
            "{} failed:\nstdout: {}\nstderr: {}",
            context,
            stdout(output),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

const VEHICLES: &str = r#"[
    {"id": "v1", "garage_latitude": 14.5547, "garage_longitude": 121.0244, "make": "Toyota", "model": "Vios"},
    {"id": "v2", "garage_latitude": 14.6091, "garage_longitude": 121.0223, "make": "Honda", "model": "City"},
    {"id": "v3", "garage_latitude": null, "garage_longitude": null}
]"#;

const TELEMETRY: &str = r#"{
    "v1": {"hasTrackingDevice": true, "liveLocation": {"latitude": 14.6, "longitude": 121.0}, "initialLoading": false, "isLive": false},
    "v2": {"hasTrackingDevice": true, "liveLocation": null, "initialLoading": false, "isLive": false}
}"#;

// =============================================================================
// status
// =============================================================================

#[test]
fn test_status_prints_labels() {
    let temp = TempDir::new().unwrap();
    let vehicles = write(temp.path(), "vehicles.json", VEHICLES);
    let telemetry = write(temp.path(), "telemetry.json", TELEMETRY);

    let output = run_cli(
        temp.path(),
        &[
            "status",
            "--vehicles",
            vehicles.to_str().unwrap(),
            "--telemetry",
            telemetry.to_str().unwrap(),
        ],
    );
    assert_success(&output, "status");

    let out = stdout(&output);
    assert!(out.contains("Layout: desktop"));
    assert!(out.contains("Last known location"));
    assert!(out.contains("14.600000, 121.000000 (device)"));
    assert!(out.contains("Waiting for device..."));
    assert!(out.contains("Garage location"));
    assert!(out.contains("not on map"));
}

#[test]
fn test_status_json_mobile_layout() {
    let temp = TempDir::new().unwrap();
    let vehicles = write(temp.path(), "vehicles.json", VEHICLES);

    let output = run_cli(
        temp.path(),
        &[
            "status",
            "--vehicles",
            vehicles.to_str().unwrap(),
            "--width",
            "390",
            "--json",
        ],
    );
    assert_success(&output, "status --json");

    let model: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(model["surface"]["layout"], "mobile");
    assert_eq!(model["surface"]["map_visible"], false);
    assert_eq!(model["markers"].as_array().unwrap().len(), 3);
    assert_eq!(model["markers"][0]["label"], "Garage location");
    assert_eq!(model["markers"][0]["name"], "Toyota Vios");
    assert_eq!(model["viewport"]["zoom"], 13);
}

#[test]
fn test_status_rejects_bad_json() {
    let temp = TempDir::new().unwrap();
    let vehicles = write(temp.path(), "vehicles.json", "{not json");

    let output = run_cli(temp.path(), &["status", "--vehicles", vehicles.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid JSON"));
}

// =============================================================================
// locate
// =============================================================================

#[test]
fn test_locate_replays_until_target() {
    let temp = TempDir::new().unwrap();
    let track = write(
        temp.path(),
        "track.json",
        r#"[
            {"delay_ms": 10, "latitude": 14.5547, "longitude": 121.0244, "accuracy": 900.0},
            {"delay_ms": 10, "latitude": 14.5551, "longitude": 121.0240, "accuracy": 65.0},
            {"delay_ms": 10, "latitude": 14.5552, "longitude": 121.0239, "accuracy": 80.0},
            {"delay_ms": 10, "latitude": 14.5550, "longitude": 121.0241, "accuracy": 12.0}
        ]"#,
    );

    let output = run_cli(
        temp.path(),
        &["locate", "--replay", track.to_str().unwrap(), "--json"],
    );
    assert_success(&output, "locate");

    let accuracies: Vec<f64> = stdout(&output)
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .map(|v| v["accuracy_m"].as_f64().unwrap())
        .collect();

    // Only strict improvements are printed, ending at the target
    assert!(accuracies.windows(2).all(|w| w[1] < w[0]));
    assert_eq!(accuracies.last(), Some(&12.0));
    assert!(!accuracies.contains(&80.0));
}

#[test]
fn test_locate_permission_denied_fails() {
    let temp = TempDir::new().unwrap();
    let track = write(
        temp.path(),
        "track.json",
        r#"[
            {"delay_ms": 10, "error": "permission_denied"},
            {"delay_ms": 10, "error": "permission_denied"}
        ]"#,
    );

    let output = run_cli(temp.path(), &["locate", "--replay", track.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unable to retrieve your location"));
}

#[test]
fn test_locate_missing_track() {
    let temp = TempDir::new().unwrap();
    let output = run_cli(temp.path(), &["locate", "--replay", "missing.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load track"));
}

// =============================================================================
// route
// =============================================================================

#[test]
fn test_route_first_vehicle_without_garage() {
    let temp = TempDir::new().unwrap();
    let vehicles = write(
        temp.path(),
        "vehicles.json",
        r#"[
            {"id": "v1"},
            {"id": "v2", "garage_latitude": 14.6, "garage_longitude": 121.0}
        ]"#,
    );

    let output = run_cli(
        temp.path(),
        &[
            "route",
            "--lat",
            "14.55",
            "--lon",
            "121.02",
            "--vehicles",
            vehicles.to_str().unwrap(),
        ],
    );
    assert_success(&output, "route");
    assert!(stdout(&output).contains("No route"));
}

#[test]
fn test_route_rejects_invalid_location() {
    let temp = TempDir::new().unwrap();
    let vehicles = write(temp.path(), "vehicles.json", VEHICLES);

    let output = run_cli(
        temp.path(),
        &[
            "route",
            "--lat",
            "95.0",
            "--lon",
            "-200.0",
            "--vehicles",
            vehicles.to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid location"));
}

// =============================================================================
// config
// =============================================================================

#[test]
fn test_config_init_and_show() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("fresh").join("config.ini");

    let output = Command::new(env!("CARGO_BIN_EXE_fleetview"))
        .args(["--config", config.to_str().unwrap(), "config", "init"])
        .output()
        .unwrap();
    assert_success(&output, "config init");
    assert!(config.exists());

    let again = Command::new(env!("CARGO_BIN_EXE_fleetview"))
        .args(["--config", config.to_str().unwrap(), "config", "init"])
        .output()
        .unwrap();
    assert!(!again.status.success());

    let show = Command::new(env!("CARGO_BIN_EXE_fleetview"))
        .args(["--config", config.to_str().unwrap(), "config", "show"])
        .output()
        .unwrap();
    assert_success(&show, "config show");
    assert!(stdout(&show).contains("base_url = https://router.project-osrm.org"));
}
