//! Core error types for pomodoro-core.
//!
//! Errors are grouped per collaborator so callers can decide which ones are
//! fatal. The session controller itself treats every store and notification
//! failure as best-effort: it logs them and keeps the timer running.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomodoro-core.
///
/// Returned by host-facing entry points such as the CLI commands.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Persistence store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Backend query failed
    #[error("Query failed: {0}")]
    Backend(#[from] rusqlite::Error),

    /// A stored value could not be decoded
    #[error("Malformed value for '{key}': {message}")]
    Malformed { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Notification scheduling errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The user or platform refused notification permission
    #[error("Notification permission denied")]
    Denied,

    /// The platform notification service failed
    #[error("Notification backend failed: {0}")]
    Backend(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_errors_convert_into_core_error() {
        let err: CoreError = ConfigError::ParseFailed("bad toml".into()).into();
        assert!(matches!(err, CoreError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: Failed to parse configuration: bad toml");

        let err: CoreError = StoreError::DataDir("read-only".into()).into();
        assert!(matches!(err, CoreError::Store(_)));

        let err: CoreError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
