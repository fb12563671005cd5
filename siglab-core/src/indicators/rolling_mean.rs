//! Trailing rolling mean.
//!
//! Mean of the last `window` values ending at each index.
//! Lookback: window - 1 (first defined value at index window-1).
//! A NaN anywhere in the window makes that output NaN.
//!
//! The running sum is Kahan-compensated, with separate compensation terms
//! for values entering and leaving the window, so rounding error does not
//! accumulate over long series.

use super::Indicator;
use crate::signal::Window;

/// Running sum with independent compensation for additions and removals.
#[derive(Debug, Clone, Copy, Default)]
struct CompensatedSum {
    sum: f64,
    add_compensation: f64,
    remove_compensation: f64,
}

impl CompensatedSum {
    fn from_window(values: &[f64]) -> Self {
        let mut acc = Self::default();
        for &v in values {
            acc.add(v);
        }
        acc
    }

    fn add(&mut self, value: f64) {
        let y = value - self.add_compensation;
        let t = self.sum + y;
        self.add_compensation = (t - self.sum) - y;
        self.sum = t;
    }

    fn remove(&mut self, value: f64) {
        let y = -value - self.remove_compensation;
        let t = self.sum + y;
        self.remove_compensation = (t - self.sum) - y;
        self.sum = t;
    }

    fn is_nan(&self) -> bool {
        self.sum.is_nan() || self.add_compensation.is_nan() || self.remove_compensation.is_nan()
    }
}

#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    name: String,
}

impl RollingMean {
    pub fn new(window: Window) -> Self {
        let window = window.get();
        Self {
            window,
            name: format!("rolling_mean_{window}"),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for RollingMean {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let mut result = vec![f64::NAN; n];

        if n < self.window {
            return result;
        }

        let mut acc = CompensatedSum::default();
        // Length of the run of identical values ending at the current index.
        // A window made of one repeated value has that value as its mean
        // exactly, without the rounding of sum / window.
        let mut same_run = 0usize;

        for i in 0..n {
            let entering = values[i];
            same_run = if i > 0 && entering == values[i - 1] {
                same_run + 1
            } else {
                1
            };

            if i >= self.window {
                let leaving = values[i - self.window];
                // A NaN poisons the running sum, so rescan the window
                // whenever one enters or leaves.
                if entering.is_nan() || leaving.is_nan() || acc.is_nan() {
                    acc = CompensatedSum::from_window(&values[(i + 1 - self.window)..=i]);
                } else {
                    acc.remove(leaving);
                    acc.add(entering);
                }
            } else {
                acc.add(entering);
            }

            if i + 1 < self.window {
                continue;
            }

            result[i] = if same_run >= self.window {
                entering
            } else {
                acc.sum / self.window as f64
            };
        }

        result
    }
}
