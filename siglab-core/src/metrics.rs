//! Signal-rate summary of an augmented table.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::rng::RngHierarchy;
use crate::signal::SIGNAL_COLUMN;
use crate::table::{Table, TableError};

/// Name reported in the `metric` field.
pub const SIGNAL_RATE_METRIC: &str = "signal_rate";

/// Decimal places kept in `MetricsRecord::value`.
pub const VALUE_DECIMALS: usize = 4;

/// Outcome status written alongside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Summary of a successful run. Field order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub version: String,
    pub rows_processed: u64,
    pub metric: String,
    pub value: f64,
    pub latency_ms: u64,
    pub seed: u64,
    pub status: Status,
}

/// Round to `decimals` places through the shortest decimal rendering of
/// the exact binary value, so ties break the way `round(x, n)` does.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

/// Whole milliseconds, truncated toward zero.
pub fn latency_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Mean of the `signal` column over every row, rounded.
pub fn signal_rate(table: &Table) -> Result<f64, TableError> {
    let signal = table.numeric_column(SIGNAL_COLUMN)?;
    if signal.is_empty() {
        return Ok(0.0);
    }
    let rate = signal.iter().sum::<f64>() / signal.len() as f64;
    Ok(round_to(rate, VALUE_DECIMALS))
}

/// Build the metrics record for an augmented table.
///
/// Latency is measured from `started` to this call.
pub fn summarize(
    table: &Table,
    started: Instant,
    version: &str,
    rng: &RngHierarchy,
) -> Result<MetricsRecord, TableError> {
    let value = signal_rate(table)?;
    Ok(MetricsRecord {
        version: version.to_string(),
        rows_processed: table.row_count() as u64,
        metric: SIGNAL_RATE_METRIC.to_string(),
        value,
        latency_ms: latency_ms(started.elapsed()),
        seed: rng.master_seed(),
        status: Status::Success,
    })
}
