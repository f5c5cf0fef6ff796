//! # Leagues Core Library
//!
//! Core logic for Leagues, a goal tracker where every hour of focused work
//! is one "league" walked. The CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Goal Store**: ordered goals, the current-goal pointer, and the
//!   per-goal work logs, written through to a [`GoalBackend`]
//! - **Session Timer**: a wall-clock session whose start time is persisted,
//!   so it survives restarts
//! - **Pomodoro Cycle**: a focus/break countdown driven by the caller's
//!   one-second `tick()`
//! - **Storage**: SQLite key-value store on this machine, a per-user JSON
//!   document when signed in, and TOML configuration
//! - **Auth Gate**: switches the backend when the signed-in user changes
//!   and migrates local goals into a new user's document
//!
//! ## Key Components
//!
//! - [`App`]: every user-facing action, with prompts and confirmations
//! - [`GoalStore`], [`SessionTimer`], [`PomodoroCycle`]
//! - [`Config`]: application configuration

pub mod app;
pub mod auth;
pub mod error;
pub mod events;
pub mod feed;
pub mod goals;
pub mod model;
pub mod pomodoro;
pub mod prompt;
pub mod session;
pub mod storage;

pub use app::{App, Status};
pub use auth::{AuthGate, IdentityProvider, StoredIdentity};
pub use error::{ConfigError, CoreError, Refusal, RemoteError, StorageError};
pub use events::Event;
pub use feed::{FeedEntry, LogFeed};
pub use goals::GoalStore;
pub use model::{ActiveSessionMarker, Goal, LeagueProgress, Log, Snapshot};
pub use pomodoro::{PomodoroCycle, PomodoroDurations, PomodoroPhase};
pub use prompt::{Prompter, ScriptedPrompter};
pub use session::{SessionState, SessionTimer};
pub use storage::{
    BackendKind, Config, DocumentStore, DurationStyle, FileDocumentStore, GoalBackend,
    HttpDocumentStore, LocalBackend, LocalStore, RemoteBackend,
};
