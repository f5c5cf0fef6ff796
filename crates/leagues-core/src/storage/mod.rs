//! Persistence: the local key/value store, the per-user remote document
//! store, the backends the Goal Store writes through, and configuration.

mod config;
pub mod document;
pub mod local;
pub mod remote;

pub use config::{Config, DisplayConfig, DurationStyle, LoggingConfig, PomodoroConfig, RemoteConfig};
pub use document::{DocumentStore, FileDocumentStore, HttpDocumentStore};
pub use local::{LocalBackend, LocalStore};
pub use remote::RemoteBackend;

use std::path::PathBuf;

use crate::error::{Result, StorageError};
use crate::model::Snapshot;

/// Where a backend keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Remote { user_id: String },
}

/// The one storage interface the Goal Store depends on.
///
/// `load` returns `None` when no record exists yet, which is how the
/// Auth Gate tells a fresh remote document from an emptied one.
pub trait GoalBackend {
    fn kind(&self) -> BackendKind;

    fn load(&self) -> Result<Option<Snapshot>>;

    fn save(&self, snapshot: &Snapshot) -> Result<()>;

    /// Remove the persisted record entirely.
    fn clear(&self) -> Result<()>;
}

/// Returns `~/.config/leagues[-dev]/` based on LEAGUES_ENV.
///
/// Set LEAGUES_ENV=dev to use a development data directory.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LEAGUES_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("leagues-dev")
    } else {
        base_dir.join("leagues")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Thin wrapper around the OS keyring for the sign-in token.
pub mod keyring_store {
    use crate::error::RemoteError;

    const SERVICE: &str = "leagues";

    pub fn get(key: &str) -> Result<Option<String>, RemoteError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), RemoteError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), RemoteError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
