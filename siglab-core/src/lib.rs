//! siglab core — table model, input validation, rolling mean, signal
//! generation, and signal-rate metrics.
//!
//! Everything here is pure computation over an in-memory `Table`:
//! - `validate` checks the loaded table (non-empty, numeric `close`)
//! - `SignalGenerator` derives `rolling_mean` and `signal` into a new table
//! - `summarize` reduces the augmented table to a `MetricsRecord`
//! - `RngHierarchy` carries the run seed explicitly

pub mod indicators;
pub mod metrics;
pub mod rng;
pub mod signal;
pub mod table;
pub mod validate;

pub use metrics::{summarize, MetricsRecord, Status};
pub use rng::RngHierarchy;
pub use signal::{SignalError, SignalGenerator, Window};
pub use table::{Column, Table, TableError, Value};
pub use validate::{validate, ValidationError};
