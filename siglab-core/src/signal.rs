//! Moving-average signal generation.
//!
//! `signal[i] = 1` when `close[i]` is strictly above its trailing rolling
//! mean, `0` otherwise. Positions where the rolling mean is undefined
//! (warmup, or a missing close inside the window) resolve to `0`: no buy
//! signal without sufficient history.

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::indicators::{Indicator, RollingMean};
use crate::table::{Column, Table, TableError};
use crate::validate::CLOSE_COLUMN;

/// Name of the derived rolling-mean column.
pub const ROLLING_MEAN_COLUMN: &str = "rolling_mean";
/// Name of the derived signal column.
pub const SIGNAL_COLUMN: &str = "signal";

/// Rolling-window size. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Window(NonZeroUsize);

impl Window {
    pub fn new(size: usize) -> Option<Self> {
        NonZeroUsize::new(size).map(Self)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for Window {
    type Error = String;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Window::new(size).ok_or_else(|| "window must be a positive integer".to_string())
    }
}

impl From<Window> for usize {
    fn from(window: Window) -> usize {
        window.get()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Derive the 0/1 signal from closes and their rolling mean.
///
/// Any comparison against NaN is false, so undefined means yield 0.
pub fn crossover_signal(closes: &[f64], rolling_mean: &[f64]) -> Vec<u8> {
    closes
        .iter()
        .zip(rolling_mean)
        .map(|(&close, &mean)| u8::from(close > mean))
        .collect()
}

/// Computes the rolling mean of `close` and the signal derived from it.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    indicator: RollingMean,
}

impl SignalGenerator {
    pub fn new(window: Window) -> Self {
        Self {
            indicator: RollingMean::new(window),
        }
    }

    pub fn window(&self) -> usize {
        self.indicator.window()
    }

    /// Build a new table with `rolling_mean` and `signal` columns appended.
    ///
    /// The input is left untouched; row count and order are preserved.
    pub fn generate(&self, table: &Table) -> Result<Table, SignalError> {
        let closes = table.numeric_column(CLOSE_COLUMN)?;

        let rolling_mean = self.indicator.compute(&closes);
        info!("Rolling mean calculated with window={}", self.window());

        let signal = crossover_signal(&closes, &rolling_mean);
        let signal: Vec<f64> = signal.into_iter().map(f64::from).collect();

        let augmented = table
            .with_column(Column::numeric(ROLLING_MEAN_COLUMN, &rolling_mean))?
            .with_column(Column::numeric(SIGNAL_COLUMN, &signal))?;
        info!("Signals generated");

        Ok(augmented)
    }
}
