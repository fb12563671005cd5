//! Series indicators.
//!
//! Indicators are pure functions: a value series in, a numeric series of the
//! same length out. The first `lookback()` outputs are `f64::NAN` (warmup).
//!
//! # Look-ahead contamination guard
//! No output at index t may depend on input at t+1 or later. Computing on a
//! truncated series must reproduce the prefix of the full-series output.

pub mod rolling_mean;

pub use rolling_mean::RollingMean;

/// Trait for series indicators.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "rolling_mean_20").
    fn name(&self) -> &str;

    /// Number of leading positions without a defined value.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the whole series.
    ///
    /// Returns a `Vec<f64>` of the same length as `values`.
    fn compute(&self, values: &[f64]) -> Vec<f64>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
