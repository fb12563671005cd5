//! Run outcome records and their JSON export.
//!
//! Both records serialize with a fixed key order and a two-space indent;
//! downstream consumers read these files by key name.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use siglab_core::{MetricsRecord, Status};

/// Version reported when a run fails before its config is known.
pub const FALLBACK_VERSION: &str = "v1";

/// Structured failure report. Field order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub version: String,
    pub status: Status,
    pub error_message: String,
}

impl ErrorRecord {
    pub fn new(version: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            status: Status::Error,
            error_message: message.into(),
        }
    }
}

/// The single record a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunOutcome {
    Success(MetricsRecord),
    Failure(ErrorRecord),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success(_))
    }

    /// Process exit code: 0 on success, 1 on failure.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    pub fn into_metrics(self) -> Option<MetricsRecord> {
        match self {
            RunOutcome::Success(m) => Some(m),
            RunOutcome::Failure(_) => None,
        }
    }

    pub fn into_error(self) -> Option<ErrorRecord> {
        match self {
            RunOutcome::Failure(e) => Some(e),
            RunOutcome::Success(_) => None,
        }
    }
}

/// Serialize an outcome to pretty JSON.
pub fn export_json(outcome: &RunOutcome) -> Result<String> {
    serde_json::to_string_pretty(outcome).context("failed to serialize run outcome to JSON")
}

/// Write the outcome JSON to `path`, replacing any existing file.
/// Returns the JSON text that was written.
pub fn write_json(outcome: &RunOutcome, path: &Path) -> Result<String> {
    let json = export_json(outcome)?;
    std::fs::write(path, &json)
        .with_context(|| format!("failed to write output to {}", path.display()))?;
    Ok(json)
}
