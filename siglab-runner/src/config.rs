//! Job configuration loaded from YAML.
//!
//! ```yaml
//! seed: 42
//! window: 5
//! version: "v1"
//! ```
//!
//! The document is first read as a generic `serde_yaml::Value` so the
//! mapping check, the order of required keys, and per-field range errors
//! are reported precisely before the typed `JobConfig` is built.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use siglab_core::Window;
use thiserror::Error;

/// Required top-level keys, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 3] = ["seed", "window", "version"];

/// Largest accepted seed (seeds are 32-bit).
pub const MAX_SEED: u64 = u32::MAX as u64;

/// Errors from loading the job config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found")]
    NotFound(PathBuf),

    #[error("Invalid config format")]
    Format(#[source] Option<serde_yaml::Error>),

    #[error("Missing config field: {0}")]
    MissingField(&'static str),

    #[error("Invalid window: expected a positive integer, got {0}")]
    InvalidWindow(String),

    #[error("Seed must be between 0 and 2**32 - 1")]
    InvalidSeed(String),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Immutable run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    pub seed: u64,
    pub window: Window,
    pub version: String,
}

impl JobConfig {
    /// Load and validate a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let doc: Value =
            serde_yaml::from_str(contents).map_err(|e| ConfigError::Format(Some(e)))?;
        let map = match doc {
            Value::Mapping(map) => map,
            _ => return Err(ConfigError::Format(None)),
        };

        for key in REQUIRED_FIELDS {
            if !map.contains_key(key) {
                return Err(ConfigError::MissingField(key));
            }
        }

        Ok(Self {
            seed: parse_seed(field(&map, "seed"))?,
            window: parse_window(field(&map, "window"))?,
            version: parse_version(field(&map, "version"))?,
        })
    }
}

/// Anything that can produce the job config.
pub trait ConfigSource {
    fn load(&self) -> Result<JobConfig, ConfigError>;
}

/// YAML file on disk.
#[derive(Debug, Clone)]
pub struct YamlConfigSource {
    path: PathBuf,
}

impl YamlConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigSource for YamlConfigSource {
    fn load(&self) -> Result<JobConfig, ConfigError> {
        JobConfig::from_file(&self.path)
    }
}

impl ConfigSource for JobConfig {
    fn load(&self) -> Result<JobConfig, ConfigError> {
        Ok(self.clone())
    }
}

fn field<'a>(map: &'a Mapping, key: &str) -> &'a Value {
    map.get(key).unwrap_or(&Value::Null)
}

fn render(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{value:?}"))
}

fn parse_seed(value: &Value) -> Result<u64, ConfigError> {
    match value.as_u64() {
        Some(seed) if seed <= MAX_SEED => Ok(seed),
        _ => Err(ConfigError::InvalidSeed(render(value))),
    }
}

fn parse_window(value: &Value) -> Result<Window, ConfigError> {
    value
        .as_u64()
        .and_then(|w| usize::try_from(w).ok())
        .and_then(Window::new)
        .ok_or_else(|| ConfigError::InvalidWindow(render(value)))
}

fn parse_version(value: &Value) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ConfigError::Format(None)),
    }
}
