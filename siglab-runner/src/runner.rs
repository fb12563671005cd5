//! Job runner — a linear state machine over the pipeline stages.
//!
//! ```text
//! Idle → ConfigLoaded → DataLoaded → Validated → SignalsGenerated → MetricsComputed
//!   └──────────┴─────────────┴────────────┴──────────────┴──────→ Failed
//! ```
//!
//! Each `step()` performs one transition. The first error short-circuits
//! to `Failed`; there are no retries. Exactly one of `MetricsRecord` or
//! `ErrorRecord` comes out of a run.

use std::time::Instant;

use siglab_core::metrics::summarize;
use siglab_core::{
    validate, MetricsRecord, RngHierarchy, SignalError, SignalGenerator, Table, TableError,
    ValidationError,
};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{ConfigError, ConfigSource, JobConfig};
use crate::data_loader::{LoadError, TableSource};
use crate::report::{ErrorRecord, RunOutcome, FALLBACK_VERSION};

/// Errors from any pipeline stage. Display is the originating message.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Signal(#[from] SignalError),
    #[error(transparent)]
    Metrics(#[from] TableError),
}

/// Configured run context: the config plus the seeded RNG built from it.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: JobConfig,
    pub rng: RngHierarchy,
}

impl RunContext {
    pub fn new(config: JobConfig) -> Self {
        let rng = RngHierarchy::new(config.seed);
        Self { config, rng }
    }
}

/// Pipeline state. Non-terminal states own everything the next stage needs.
#[derive(Debug)]
pub enum RunState {
    Idle,
    ConfigLoaded(RunContext),
    DataLoaded(RunContext, Table),
    Validated(RunContext, Table),
    SignalsGenerated(RunContext, Table),
    MetricsComputed(MetricsRecord),
    Failed(ErrorRecord),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::MetricsComputed(_) | RunState::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::ConfigLoaded(..) => "config_loaded",
            RunState::DataLoaded(..) => "data_loaded",
            RunState::Validated(..) => "validated",
            RunState::SignalsGenerated(..) => "signals_generated",
            RunState::MetricsComputed(_) => "metrics_computed",
            RunState::Failed(_) => "failed",
        }
    }

    /// Version known in this state, if the config has been loaded.
    fn version(&self) -> Option<&str> {
        match self {
            RunState::ConfigLoaded(ctx)
            | RunState::DataLoaded(ctx, _)
            | RunState::Validated(ctx, _)
            | RunState::SignalsGenerated(ctx, _) => Some(&ctx.config.version),
            RunState::MetricsComputed(m) => Some(&m.version),
            RunState::Failed(e) => Some(&e.version),
            RunState::Idle => None,
        }
    }
}

/// Drives one job from `Idle` to a terminal state.
pub struct JobRunner<'a> {
    config_source: &'a dyn ConfigSource,
    table_source: &'a dyn TableSource,
    started: Instant,
    state: RunState,
}

impl<'a> JobRunner<'a> {
    /// Latency is measured from `started`.
    pub fn new(
        config_source: &'a dyn ConfigSource,
        table_source: &'a dyn TableSource,
        started: Instant,
    ) -> Self {
        Self {
            config_source,
            table_source,
            started,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Perform one transition. Terminal states are left unchanged.
    pub fn step(&mut self) {
        let state = std::mem::replace(&mut self.state, RunState::Idle);
        let fallback_version = state.version().unwrap_or(FALLBACK_VERSION).to_string();
        self.state = match self.advance(state) {
            Ok(next) => next,
            Err(err) => {
                let message = err.to_string();
                error!("{message}");
                RunState::Failed(ErrorRecord::new(fallback_version, message))
            }
        };
    }

    /// Step until a terminal state and return its record.
    pub fn run(mut self) -> RunOutcome {
        loop {
            match self.state {
                RunState::MetricsComputed(metrics) => return RunOutcome::Success(metrics),
                RunState::Failed(err) => return RunOutcome::Failure(err),
                _ => self.step(),
            }
        }
    }

    fn advance(&self, state: RunState) -> Result<RunState, RunError> {
        Ok(match state {
            RunState::Idle => {
                let config = self.config_source.load()?;
                info!(
                    "Config loaded: seed={}, window={}, version={}",
                    config.seed, config.window, config.version
                );
                RunState::ConfigLoaded(RunContext::new(config))
            }
            RunState::ConfigLoaded(ctx) => {
                debug!("Loading data from {}", self.table_source.describe());
                let table = self.table_source.load()?;
                info!("Data loaded: {} rows", table.row_count());
                RunState::DataLoaded(ctx, table)
            }
            RunState::DataLoaded(ctx, table) => {
                let table = validate(table)?;
                RunState::Validated(ctx, table)
            }
            RunState::Validated(ctx, table) => {
                let generator = SignalGenerator::new(ctx.config.window);
                let augmented = generator.generate(&table)?;
                RunState::SignalsGenerated(ctx, augmented)
            }
            RunState::SignalsGenerated(ctx, table) => {
                let metrics = summarize(&table, self.started, &ctx.config.version, &ctx.rng)?;
                info!(
                    "Metrics: signal_rate={}, rows_processed={}",
                    metrics.value, metrics.rows_processed
                );
                info!("Job completed successfully in {}ms", metrics.latency_ms);
                RunState::MetricsComputed(metrics)
            }
            terminal => terminal,
        })
    }
}

/// Run a job end to end.
pub fn run_job(
    config_source: &dyn ConfigSource,
    table_source: &dyn TableSource,
    started: Instant,
) -> RunOutcome {
    info!("Job started");
    JobRunner::new(config_source, table_source, started).run()
}
