use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pomodoro::PomodoroPhase;

/// Every state change in the system produces an Event.
/// Front ends render from them; `--json` output prints them as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    GoalCreated {
        goal_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    GoalRenamed {
        goal_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    GoalDeleted {
        goal_id: String,
        at: DateTime<Utc>,
    },
    GoalSelected {
        goal_id: String,
        at: DateTime<Utc>,
    },
    SessionStarted {
        goal_id: String,
        start_time_ms: i64,
        at: DateTime<Utc>,
    },
    /// The process came back up and picked up a persisted session.
    SessionResumed {
        goal_id: String,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        goal_id: String,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionUnpaused {
        goal_id: String,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionStopped {
        goal_id: String,
        duration_secs: u64,
        /// False when the session was too short to produce a log.
        logged: bool,
        at: DateTime<Utc>,
    },
    PomodoroChanged {
        from: PomodoroPhase,
        to: PomodoroPhase,
        seconds_remaining: u64,
        /// True when the countdown reached zero rather than a user action.
        automatic: bool,
        at: DateTime<Utc>,
    },
    BackendSwitched {
        user_id: Option<String>,
        migrated: bool,
        at: DateTime<Utc>,
    },
    EverythingReset {
        at: DateTime<Utc>,
    },
}
