//! siglab CLI — run the moving-average signal-rate job.
//!
//! Reads a CSV with a `close` column and a YAML config (`seed`, `window`,
//! `version`), writes the metrics record (or an error record) as JSON to
//! `--output`, echoes it to stdout, and exits 0 on success, 1 on failure.

mod logging;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use siglab_runner::{
    run_job, write_json, CsvTableSource, ErrorRecord, RunOutcome, YamlConfigSource,
};
use tracing::error;

#[derive(Parser)]
#[command(
    name = "siglab",
    about = "siglab — moving-average signal-rate batch job"
)]
struct Cli {
    /// Path to the input CSV.
    #[arg(long)]
    input: PathBuf,

    /// Path to the YAML config.
    #[arg(long)]
    config: PathBuf,

    /// Path to write the metrics JSON.
    #[arg(long)]
    output: PathBuf,

    /// Path to the log file (appended).
    #[arg(long)]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_file)?;

    let started = Instant::now();
    let outcome = run_job(
        &YamlConfigSource::new(&cli.config),
        &CsvTableSource::new(&cli.input),
        started,
    );

    let code = emit(&outcome, &cli);
    std::process::exit(code);
}

/// Write the record to the output file and stdout. A failed write of a
/// metrics record is itself reported as an error record.
fn emit(outcome: &RunOutcome, cli: &Cli) -> i32 {
    match write_json(outcome, &cli.output) {
        Ok(json) => {
            println!("{json}");
            outcome.exit_code()
        }
        Err(e) => {
            let message = format!("{e:#}");
            error!("{message}");
            let version = match outcome {
                RunOutcome::Success(m) => m.version.clone(),
                RunOutcome::Failure(f) => f.version.clone(),
            };
            let fallback = RunOutcome::Failure(ErrorRecord::new(version, message));
            match siglab_runner::export_json(&fallback) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("{e:#}"),
            }
            1
        }
    }
}
