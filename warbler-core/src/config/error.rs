//! Errors raised while loading or saving Warbler configuration
//!
//! File and TOML failures carry the underlying message. A bad `WARBLER_*`
//! override names the variable it came from.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {reason}", .path.display())]
    FileReadError { path: PathBuf, reason: String },

    #[error("Failed to write config file {}: {reason}", .path.display())]
    FileWriteError { path: PathBuf, reason: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(String),

    /// An environment override could not be parsed
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}
