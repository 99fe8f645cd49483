//! TOML loading for the device configuration and replay scenarios.
//!
//! Both files go through [`ConfigLoader`]: missing files and syntax or type
//! errors map onto [`ConfigError`], and semantic checks (empty service name,
//! malformed command patterns) are left to the caller's `validate`.
//!
//! ```rust,no_run
//! use cia402_common::config::{ConfigError, ConfigLoader, SharedConfig};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Debug, Deserialize)]
//! struct AxisFile {
//!     shared: SharedConfig,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let file = AxisFile::load(Path::new("device.toml"))?;
//!     file.shared.validate()?;
//!     println!("axis {}", file.shared.service_name);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Failure to produce a usable device config or scenario.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The path does not exist.
    #[error("Configuration file not found")]
    FileNotFound,

    /// Unreadable file, bad TOML, unknown key or wrong value type.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Parsed, but a value is unusable (e.g. a pattern outside its mask).
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Default verbosity of the simulator's subscriber, written lowercase in
/// TOML (`log_level = "debug"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Adds a line for every cycle the axis holds its state.
    Trace,
    /// Adds every recorded transition with its CiA 402 number.
    Debug,
    /// One line per replayed cycle.
    #[default]
    Info,
    /// Only state recovery and end-of-run warnings.
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// `[shared]` table of a device config: which axis this is and how loud
/// it logs.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "axis-x"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Axis name used as the log prefix.
    pub service_name: String,
}

impl SharedConfig {
    /// Rejects an empty `service_name`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// TOML loading for any deserializable config or scenario type.
///
/// `load` reports a missing path as `FileNotFound`; every other read or
/// decode failure becomes `ParseError`.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;
        debug!("Loaded {} bytes from {}", content.len(), path.display());

        Self::from_toml(&content)
    }

    /// Parse TOML text already in memory.
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
