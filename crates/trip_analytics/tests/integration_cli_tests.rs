mod support;

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

use support::{raw_csv_file, ROWS};

fn trip_analytics(data: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trip-analytics"))
        .arg("--data")
        .arg(data)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("trip-analytics should run")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn clean_writes_exclusions_when_every_row_is_excluded() {
    let input = raw_csv_file(&ROWS[6..]);
    let dir = tempdir().unwrap();
    let cleaned = dir.path().join("cleaned.csv");
    let excluded = dir.path().join("excluded.json");

    let output = trip_analytics(
        input.path(),
        &[
            "clean",
            "--output",
            cleaned.to_str().unwrap(),
            "--excluded",
            excluded.to_str().unwrap(),
        ],
    );

    assert!(output.status.success());
    assert!(!cleaned.exists());
    let rows: Value = serde_json::from_str(&std::fs::read_to_string(&excluded).unwrap()).unwrap();
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
}

#[test]
fn cleaned_output_reloads_with_cleaned_flag() {
    let input = raw_csv_file(&ROWS);
    let dir = tempdir().unwrap();
    let cleaned = dir.path().join("cleaned.csv");
    let excluded = dir.path().join("excluded.json");

    let output = trip_analytics(
        input.path(),
        &[
            "clean",
            "--output",
            cleaned.to_str().unwrap(),
            "--excluded",
            excluded.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());

    let summary = stdout_json(&trip_analytics(&cleaned, &["--cleaned", "summary"]));
    assert_eq!(summary["total_trips"], 6);
}

#[test]
fn top_prints_selected_trips() {
    let input = raw_csv_file(&ROWS);
    let top = stdout_json(&trip_analytics(
        input.path(),
        &["top", "--metric", "trip_distance", "--k", "1"],
    ));
    let trips = top.as_array().unwrap();
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0]["id"], "id0000001");
}

#[test]
fn negative_k_fails() {
    let input = raw_csv_file(&ROWS);
    let output = trip_analytics(input.path(), &["top", "--k", "-1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn stats_respects_vendor_filter() {
    let input = raw_csv_file(&ROWS);
    let stats = stdout_json(&trip_analytics(input.path(), &["stats", "--vendor-id", "2"]));
    assert_eq!(stats["total_trips"], 3);
    assert_eq!(stats["duration_distribution"]["long"], 1);
    assert_eq!(stats["passenger_distribution"]["5+"], 1);
}

#[test]
fn trip_lookup_exit_codes() {
    let input = raw_csv_file(&ROWS);

    let found = stdout_json(&trip_analytics(input.path(), &["trip", "id2875421"]));
    assert_eq!(found["vendor_id"], 2);

    let missing = trip_analytics(input.path(), &["trip", "id9999999"]);
    assert_eq!(missing.status.code(), Some(2));
}

#[test]
fn invalid_zone_resolution_fails() {
    let input = raw_csv_file(&ROWS);
    let dir = tempdir().unwrap();
    let cleaned = dir.path().join("cleaned.csv");

    let output = trip_analytics(
        input.path(),
        &["clean", "--output", cleaned.to_str().unwrap(), "--zone-resolution", "16"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(!cleaned.exists());
}
