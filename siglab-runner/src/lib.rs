//! siglab runner — loads the job inputs, drives the pipeline state
//! machine, and exports the run record.
//!
//! This crate builds on `siglab-core` to provide:
//! - YAML config loading with per-field validation
//! - CSV table loading
//! - The `Idle → … → MetricsComputed | Failed` run state machine
//! - Metrics / error record JSON export

pub mod config;
pub mod data_loader;
pub mod report;
pub mod runner;

pub use config::{ConfigError, ConfigSource, JobConfig, YamlConfigSource};
pub use data_loader::{read_csv, CsvTableSource, InMemoryTable, LoadError, TableSource};
pub use report::{export_json, write_json, ErrorRecord, RunOutcome, FALLBACK_VERSION};
pub use runner::{run_job, JobRunner, RunContext, RunError, RunState};
