//! End-to-end runs over real files.
//!
//! Each test writes a CSV and a YAML config into a temp dir, runs the job
//! through the file-backed sources, and checks the single record produced.

use std::path::{Path, PathBuf};
use std::time::Instant;

use siglab_core::Status;
use siglab_runner::{
    run_job, write_json, CsvTableSource, RunOutcome, YamlConfigSource, FALLBACK_VERSION,
};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn run(config: &Path, input: &Path) -> RunOutcome {
    run_job(
        &YamlConfigSource::new(config),
        &CsvTableSource::new(input),
        Instant::now(),
    )
}

fn ohlc_csv(closes: &[f64]) -> String {
    let mut csv = String::from("timestamp,open,high,low,close,volume_btc,volume_usd\n");
    for (i, c) in closes.iter().enumerate() {
        csv.push_str(&format!(
            "2024-01-01 00:{:02}:00,{c},{},{},{c},1.5,{}\n",
            i % 60,
            c + 1.0,
            c - 1.0,
            c * 1.5
        ));
    }
    csv
}

const CONFIG: &str = "seed: 42\nwindow: 5\nversion: \"v1\"\n";

#[test]
fn successful_run_reports_signal_rate() {
    let fx = Fixture::new();
    let closes: Vec<f64> = (0..100).map(|i| 100.0 + ((i * 7) % 11) as f64).collect();
    let input = fx.write("data.csv", &ohlc_csv(&closes));
    let config = fx.write("config.yaml", CONFIG);

    let outcome = run(&config, &input);
    assert_eq!(outcome.exit_code(), 0);
    let metrics = outcome.into_metrics().unwrap();

    assert_eq!(metrics.version, "v1");
    assert_eq!(metrics.rows_processed, 100);
    assert_eq!(metrics.metric, "signal_rate");
    assert_eq!(metrics.seed, 42);
    assert_eq!(metrics.status, Status::Success);
    assert!((0.0..=1.0).contains(&metrics.value));
}

#[test]
fn known_series_signal_rate() {
    let fx = Fixture::new();
    // window 2: signals at rows 1, 2, 4 → 3 of 6
    let input = fx.write("data.csv", "close\n1\n2\n3\n2\n4\n4\n");
    let config = fx.write("config.yaml", "seed: 7\nwindow: 2\nversion: test\n");

    let metrics = run(&config, &input).into_metrics().unwrap();
    assert_eq!(metrics.value, 0.5);
    assert_eq!(metrics.rows_processed, 6);
    assert_eq!(metrics.version, "test");
}

#[test]
fn reruns_are_identical_except_latency() {
    let fx = Fixture::new();
    let closes: Vec<f64> = (0..500).map(|i| 50.0 + (i as f64 * 0.3).sin() * 5.0).collect();
    let input = fx.write("data.csv", &ohlc_csv(&closes));
    let config = fx.write("config.yaml", CONFIG);

    let a = run(&config, &input).into_metrics().unwrap();
    let b = run(&config, &input).into_metrics().unwrap();

    assert_eq!(a.value.to_bits(), b.value.to_bits());
    assert_eq!(a.rows_processed, b.rows_processed);
    assert_eq!(a.version, b.version);
    assert_eq!(a.seed, b.seed);
}

#[test]
fn header_only_csv_is_empty_input() {
    let fx = Fixture::new();
    let input = fx.write("data.csv", "timestamp,close\n");
    let config = fx.write("config.yaml", CONFIG);

    let outcome = run(&config, &input);
    assert_eq!(outcome.exit_code(), 1);
    let err = outcome.into_error().unwrap();
    assert_eq!(err.status, Status::Error);
    assert_eq!(err.error_message, "CSV file is empty");
}

#[test]
fn zero_byte_csv_is_format_error() {
    let fx = Fixture::new();
    let input = fx.write("data.csv", "");
    let config = fx.write("config.yaml", CONFIG);

    let err = run(&config, &input).into_error().unwrap();
    assert_eq!(err.error_message, "Invalid CSV format");
}

#[test]
fn missing_close_column() {
    let fx = Fixture::new();
    let input = fx.write("data.csv", "timestamp,open\n1,2\n3,4\n");
    let config = fx.write("config.yaml", CONFIG);

    let err = run(&config, &input).into_error().unwrap();
    assert_eq!(err.error_message, "Missing required column: close");
    assert_eq!(err.version, "v1");
}

#[test]
fn textual_close_is_rejected() {
    let fx = Fixture::new();
    let input = fx.write("data.csv", "close\n1\nabc\n3\n");
    let config = fx.write("config.yaml", CONFIG);

    let err = run(&config, &input).into_error().unwrap();
    assert_eq!(err.error_message, "Non-numeric value in column 'close' at row 2");
}

#[test]
fn na_close_cells_run_with_zero_signal() {
    let fx = Fixture::new();
    // Signals at rows 1 and 4 only: the NA row and the row after it
    // have no defined mean.
    let input = fx.write("data.csv", "close\n1\n2\nNA\n3\n4\n");
    let config = fx.write("config.yaml", "seed: 1\nwindow: 2\nversion: v1\n");

    let outcome = run(&config, &input);
    assert_eq!(outcome.exit_code(), 0);
    let metrics = outcome.into_metrics().unwrap();
    assert_eq!(metrics.rows_processed, 5);
    assert_eq!(metrics.value, 0.4);
}

#[test]
fn padded_close_header_is_missing_column() {
    let fx = Fixture::new();
    let input = fx.write("data.csv", "timestamp, close\n1,2\n3,4\n");
    let config = fx.write("config.yaml", CONFIG);

    let err = run(&config, &input).into_error().unwrap();
    assert_eq!(err.error_message, "Missing required column: close");
}

#[test]
fn missing_input_file() {
    let fx = Fixture::new();
    let config = fx.write("config.yaml", "seed: 1\nwindow: 3\nversion: v7\n");

    let err = run(&config, &fx.path("nope.csv")).into_error().unwrap();
    assert_eq!(err.error_message, "Input file not found");
    // Config was loaded before the failure.
    assert_eq!(err.version, "v7");
}

#[test]
fn missing_config_file_uses_fallback_version() {
    let fx = Fixture::new();
    let input = fx.write("data.csv", "close\n1\n");

    let err = run(&fx.path("nope.yaml"), &input).into_error().unwrap();
    assert_eq!(err.error_message, "Config file not found");
    assert_eq!(err.version, FALLBACK_VERSION);
}

#[test]
fn invalid_window_in_config() {
    let fx = Fixture::new();
    let input = fx.write("data.csv", "close\n1\n");
    let config = fx.write("config.yaml", "seed: 1\nwindow: 0\nversion: v1\n");

    let err = run(&config, &input).into_error().unwrap();
    assert!(err.error_message.starts_with("Invalid window"));
}

#[test]
fn non_mapping_config() {
    let fx = Fixture::new();
    let input = fx.write("data.csv", "close\n1\n");
    let config = fx.write("config.yaml", "just a string\n");

    let err = run(&config, &input).into_error().unwrap();
    assert_eq!(err.error_message, "Invalid config format");
}

#[test]
fn output_file_matches_record() {
    let fx = Fixture::new();
    let input = fx.write("data.csv", "close\n1\n2\n3\n");
    let config = fx.write("config.yaml", "seed: 3\nwindow: 1\nversion: v1\n");
    let output = fx.path("metrics.json");

    let outcome = run(&config, &input);
    let json = write_json(&outcome, &output).unwrap();

    let on_disk = std::fs::read_to_string(&output).unwrap();
    assert_eq!(on_disk, json);

    let parsed: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
    assert_eq!(parsed["status"], "success");
    assert_eq!(parsed["rows_processed"], 3);
    assert_eq!(parsed["value"], 0.0);
    assert_eq!(parsed["seed"], 3);
    let keys: Vec<&str> = parsed.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 7);
}

#[test]
fn error_output_overwrites_previous_file() {
    let fx = Fixture::new();
    let output = fx.write("metrics.json", "stale contents that are longer than the new record");

    let outcome = run(&fx.path("missing.yaml"), &fx.path("missing.csv"));
    write_json(&outcome, &output).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(parsed["status"], "error");
    assert_eq!(parsed["error_message"], "Config file not found");
    assert_eq!(parsed["version"], "v1");
}
