//! SQLite-backed local key/value store.
//!
//! Holds the signed-out goal list, the current-goal pointer, the active
//! session marker and the signed-in identity, each under a fixed key.

use std::path::Path;
use std::rc::Rc;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{data_dir, BackendKind, GoalBackend};
use crate::error::{Result, StorageError};
use crate::model::{ActiveSessionMarker, Snapshot};

pub const KEY_GOALS: &str = "goals";
pub const KEY_CURRENT_GOAL: &str = "currentGoalId";
pub const KEY_ACTIVE_SESSION: &str = "activeSession";
pub const KEY_AUTH_USER: &str = "authUser";

/// Keys wiped by a full reset. The signed-in identity survives it.
const APP_KEYS: [&str; 3] = [KEY_GOALS, KEY_CURRENT_GOAL, KEY_ACTIVE_SESSION];

/// Local persistent store. Cloning shares the same connection.
#[derive(Clone)]
pub struct LocalStore {
    conn: Rc<Connection>,
}

impl LocalStore {
    /// Open the store at `~/.config/leagues/leagues.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("leagues.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store (for tests and dry runs).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .map_err(StorageError::from)?;
        Ok(Self {
            conn: Rc::new(conn),
        })
    }

    // ── Raw key/value ────────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv WHERE key = ?1")
            .map_err(StorageError::from)?;
        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::from(e).into()),
        }
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(StorageError::from)?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.kv_get(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| {
                    StorageError::Corrupt {
                        key: key.to_string(),
                        message: e.to_string(),
                    }
                    .into()
                }),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.kv_set(key, &serde_json::to_string(value)?)
    }

    // ── Goals ────────────────────────────────────────────────────────

    /// `None` when nothing has ever been saved (or after a reset).
    pub fn load_snapshot(&self) -> Result<Option<Snapshot>> {
        let Some(goals) = self.get_json(KEY_GOALS)? else {
            return Ok(None);
        };
        Ok(Some(Snapshot {
            goals,
            current_goal_id: self.kv_get(KEY_CURRENT_GOAL)?,
        }))
    }

    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.set_json(KEY_GOALS, &snapshot.goals)?;
        match &snapshot.current_goal_id {
            Some(id) => self.kv_set(KEY_CURRENT_GOAL, id),
            None => self.kv_delete(KEY_CURRENT_GOAL),
        }
    }

    // ── Active session marker ────────────────────────────────────────

    pub fn load_marker(&self) -> Result<Option<ActiveSessionMarker>> {
        self.get_json(KEY_ACTIVE_SESSION)
    }

    pub fn save_marker(&self, marker: &ActiveSessionMarker) -> Result<()> {
        self.set_json(KEY_ACTIVE_SESSION, marker)
    }

    pub fn clear_marker(&self) -> Result<()> {
        self.kv_delete(KEY_ACTIVE_SESSION)
    }

    /// Drop the goals, the current pointer and any session marker.
    pub fn clear_app_data(&self) -> Result<()> {
        for key in APP_KEYS {
            self.kv_delete(key)?;
        }
        Ok(())
    }
}

/// Signed-out backend: the goal list lives in the local store.
#[derive(Clone)]
pub struct LocalBackend {
    store: LocalStore,
}

impl LocalBackend {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }
}

impl GoalBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        self.store.load_snapshot()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.store.save_snapshot(snapshot)
    }

    fn clear(&self) -> Result<()> {
        self.store.kv_delete(KEY_GOALS)?;
        self.store.kv_delete(KEY_CURRENT_GOAL)
    }
}
