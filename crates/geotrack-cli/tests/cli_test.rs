//! End-to-end tests for the geotrack binary

use std::io::Write;
use std::process::{Command, Output};

use serde_json::Value;

fn geotrack(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_geotrack"))
        .args(args)
        .env_remove("GEOTRACK_DRIVING_SPEED_KMH")
        .env_remove("GEOTRACK_TRAFFIC_MULTIPLIER")
        .env_remove("GEOTRACK_CLUSTER_RADIUS_KM")
        .output()
        .expect("Failed to execute geotrack")
}

fn json_data(output: &Output) -> Value {
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let parsed: Value =
        serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
    assert_eq!(parsed["status"], "success");
    parsed["data"].clone()
}

fn temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_route_json_output() {
    let output = geotrack(&[
        "route", "--from", "9.0,38.7", "--to", "9.1,38.8", "--traffic", "--json",
    ]);
    let route = json_data(&output);

    assert_eq!(route["transport_mode"], "driving");
    assert_eq!(route["legs"].as_array().unwrap().len(), 2);
    assert!(route["total_distance_km"].as_f64().unwrap() > 15.0);
}

#[test]
fn test_route_speed_override_shortens_eta() {
    let base = json_data(&geotrack(&["route", "--from", "9.0,38.7", "--to", "9.1,38.8", "--json"]));
    let fast = json_data(&geotrack(&[
        "route", "--from", "9.0,38.7", "--to", "9.1,38.8", "--driving-speed", "60", "--json",
    ]));

    let base_secs = base["estimated_duration_secs"].as_u64().unwrap();
    let fast_secs = fast["estimated_duration_secs"].as_u64().unwrap();
    assert!(fast_secs < base_secs);
}

#[test]
fn test_route_rejects_bad_coordinate() {
    let output = geotrack(&["route", "--from", "99,38.7", "--to", "9.1,38.8"]);
    assert!(!output.status.success());
}

#[test]
fn test_distance_json_output() {
    let data = json_data(&geotrack(&["distance", "0,0", "0,1", "--json"]));
    let distance = data["distance_km"].as_f64().unwrap();
    assert!((distance - 111.195).abs() < 0.01);
    assert!((data["bearing_degrees"].as_f64().unwrap() - 90.0).abs() < 1e-6);
}

#[test]
fn test_cluster_from_file() {
    let file = temp_file(
        r#"[
            {"driver_id": 1, "latitude": 9.0000, "longitude": 38.7000,
             "observed_at": "2024-05-01T10:00:00Z"},
            {"driver_id": 2, "latitude": 9.0010, "longitude": 38.7010,
             "observed_at": "2024-05-01T10:00:00Z"},
            {"driver_id": 3, "latitude": 9.5000, "longitude": 38.7000,
             "observed_at": "2024-05-01T10:00:00Z"}
        ]"#,
    );
    let path = file.path().to_str().unwrap();

    let data = json_data(&geotrack(&["cluster", path, "--radius-km", "5", "--json"]));
    assert_eq!(data["total_clusters"], 2);
    assert_eq!(data["total_drivers"], 3);
}

#[test]
fn test_heatmap_from_file() {
    let file = temp_file(
        r#"[
            {"delivery_id": 1, "region": "Addis Ababa", "subregion": "Bole-03",
             "completed_at": "2024-05-01T09:00:00Z"},
            {"delivery_id": 2, "region": "Addis Ababa", "subregion": "Bole-03",
             "completed_at": "2024-05-01T11:00:00Z"},
            {"delivery_id": 3, "region": "Addis Ababa", "subregion": "Kirkos-01",
             "completed_at": "2024-05-01T12:00:00Z"},
            {"delivery_id": 4, "region": "Adama", "subregion": "Dabe",
             "completed_at": "2024-05-03T12:00:00Z"}
        ]"#,
    );
    let path = file.path().to_str().unwrap();

    let data = json_data(&geotrack(&[
        "heatmap",
        path,
        "--start",
        "2024-05-01T00:00:00Z",
        "--end",
        "2024-05-02T00:00:00Z",
        "--json",
    ]));
    assert_eq!(data["total_deliveries"], 3);
    assert_eq!(data["cells"][0]["subregion"], "Bole-03");
    assert_eq!(data["cells"][0]["delivery_count"], 2);
}

#[test]
fn test_config_reports_sources() {
    let file = temp_file("traffic_multiplier = 1.5\n");
    let output = Command::new(env!("CARGO_BIN_EXE_geotrack"))
        .args([
            "config",
            "--json",
            "--config",
            file.path().to_str().unwrap(),
            "--driving-speed",
            "40",
        ])
        .env_remove("GEOTRACK_DRIVING_SPEED_KMH")
        .env_remove("GEOTRACK_TRAFFIC_MULTIPLIER")
        .env("GEOTRACK_WALKING_SPEED_KMH", "6")
        .output()
        .expect("Failed to execute geotrack");

    let data = json_data(&output);
    let entries = data.as_array().unwrap();
    let source_of = |key: &str| {
        entries.iter().find(|e| e["key"] == key).map(|e| e["source"].clone()).unwrap()
    };

    assert_eq!(source_of("traffic_multiplier"), "File");
    assert_eq!(source_of("walking_speed_kmh"), "Environment");
    assert_eq!(source_of("driving_speed_kmh"), "Cli");
    assert_eq!(source_of("online_window_secs"), "Default");
}
