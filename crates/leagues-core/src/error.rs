//! Core error types for leagues-core.
//!
//! This module defines the error hierarchy using thiserror. Precondition
//! violations (starting a session without a goal, deleting the last goal)
//! are modelled as [`Refusal`] so front ends can show the message as-is.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for leagues-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Local storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote document store errors
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The action was refused because a precondition does not hold
    #[error("{0}")]
    Refused(#[from] Refusal),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// User-facing precondition violations. None of these are fatal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    #[error("Create a goal first!")]
    NoGoalSelected,

    #[error("You need at least one goal.")]
    LastGoal,

    #[error("A session is already running.")]
    SessionAlreadyRunning,

    #[error("No session is running.")]
    NoSessionRunning,

    /// Switching goals would orphan the running session's marker.
    #[error("Stop the running session before switching goals.")]
    SessionRunning,
}

/// Local key/value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored value could not be decoded
    #[error("Corrupt value under key '{key}': {message}")]
    Corrupt { key: String, message: String },

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Remote document store errors.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an unexpected status
    #[error("Unexpected status {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// The configured endpoint is not a valid base URL
    #[error("Invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    /// Keyring access failed
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// A document file could not be read or written
    #[error("Document file {path}: {message}")]
    File { path: PathBuf, message: String },
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

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

impl CoreError {
    /// The refusal behind this error, if it is one.
    pub fn refusal(&self) -> Option<Refusal> {
        match self {
            CoreError::Refused(r) => Some(*r),
            _ => None,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusal_messages_are_user_facing() {
        assert_eq!(Refusal::NoGoalSelected.to_string(), "Create a goal first!");
        assert_eq!(Refusal::LastGoal.to_string(), "You need at least one goal.");
        let err: CoreError = Refusal::LastGoal.into();
        assert_eq!(err.to_string(), "You need at least one goal.");
        assert_eq!(err.refusal(), Some(Refusal::LastGoal));
    }

    #[test]
    fn locked_sqlite_maps_to_locked() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            None,
        );
        assert!(matches!(StorageError::from(err), StorageError::Locked));
    }
}
