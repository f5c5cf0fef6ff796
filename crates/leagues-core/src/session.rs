//! Session timer.
//!
//! Tracks one running work session against a goal. Elapsed time is always
//! derived from the persisted start time (`now - start_time`), never
//! accumulated per tick, so a session survives process restarts and tick
//! drift without losing time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!   ^________|__________|   (stop)
//! ```
//!
//! Pausing is only used by the pomodoro break coordination. Ending a pause
//! shifts `start_time` forward by the paused span.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Refusal, Result};
use crate::events::Event;
use crate::goals::GoalStore;
use crate::model::{whole_secs_between, ActiveSessionMarker};
use crate::storage::LocalStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
}

/// Result of stopping a session: what the caller should log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSession {
    pub goal_id: String,
    pub duration_secs: u64,
}

pub struct SessionTimer {
    store: LocalStore,
    marker: Option<ActiveSessionMarker>,
}

impl SessionTimer {
    /// An idle timer. Call `resume` to pick up a persisted session.
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            marker: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        match &self.marker {
            None => SessionState::Idle,
            Some(m) if m.paused_at.is_some() => SessionState::Paused,
            Some(_) => SessionState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.marker.is_some()
    }

    pub fn marker(&self) -> Option<&ActiveSessionMarker> {
        self.marker.as_ref()
    }

    pub fn goal_id(&self) -> Option<&str> {
        self.marker.as_ref().map(|m| m.goal_id.as_str())
    }

    /// Whole seconds of the running session at `now`; 0 when idle. A paused
    /// session reports the time up to the pause.
    pub fn elapsed_secs(&self, now: i64) -> u64 {
        match &self.marker {
            Some(m) => whole_secs_between(m.start_time, m.paused_at.unwrap_or(now)),
            None => 0,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Pick up a persisted session after a restart.
    ///
    /// Resumes only when the marker belongs to the current goal. A marker
    /// whose goal is gone is discarded; a marker for another existing goal
    /// is left alone until that goal is current again.
    pub fn resume(&mut self, goals: &GoalStore, now: i64) -> Result<Option<Event>> {
        if self.marker.is_some() {
            return Ok(None);
        }
        let Some(marker) = self.store.load_marker()? else {
            return Ok(None);
        };

        if goals.get(&marker.goal_id).is_none() {
            tracing::debug!(goal_id = %marker.goal_id, "discarding stale session marker");
            self.store.clear_marker()?;
            return Ok(None);
        }
        if goals.current_id() != Some(marker.goal_id.as_str()) {
            return Ok(None);
        }

        let elapsed_secs = whole_secs_between(marker.start_time, marker.paused_at.unwrap_or(now));
        let event = Event::SessionResumed {
            goal_id: marker.goal_id.clone(),
            elapsed_secs,
            at: Utc::now(),
        };
        self.marker = Some(marker);
        Ok(Some(event))
    }

    pub fn start(&mut self, goals: &GoalStore, now: i64) -> Result<Event> {
        if self.marker.is_some() {
            return Err(Refusal::SessionAlreadyRunning.into());
        }
        let goal = goals.current().ok_or(Refusal::NoGoalSelected)?;

        let marker = ActiveSessionMarker {
            goal_id: goal.id.clone(),
            start_time: now,
            paused_at: None,
        };
        self.store.save_marker(&marker)?;
        self.marker = Some(marker);

        Ok(Event::SessionStarted {
            goal_id: goal.id.clone(),
            start_time_ms: now,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self, now: i64) -> Result<Option<Event>> {
        let Some(marker) = self.marker.as_mut() else {
            return Ok(None);
        };
        if marker.paused_at.is_some() {
            return Ok(None);
        }
        marker.paused_at = Some(now);
        let event = Event::SessionPaused {
            goal_id: marker.goal_id.clone(),
            elapsed_secs: whole_secs_between(marker.start_time, now),
            at: Utc::now(),
        };
        self.store.save_marker(marker)?;
        Ok(Some(event))
    }

    /// End a pause; the paused span does not count towards the session.
    pub fn unpause(&mut self, now: i64) -> Result<Option<Event>> {
        let Some(marker) = self.marker.as_mut() else {
            return Ok(None);
        };
        let Some(paused_at) = marker.paused_at.take() else {
            return Ok(None);
        };
        marker.start_time += now.saturating_sub(paused_at).max(0);
        let event = Event::SessionUnpaused {
            goal_id: marker.goal_id.clone(),
            elapsed_secs: whole_secs_between(marker.start_time, now),
            at: Utc::now(),
        };
        self.store.save_marker(marker)?;
        Ok(Some(event))
    }

    /// Stop the session and clear the marker. Logging the result is the
    /// caller's job.
    pub fn stop(&mut self, now: i64) -> Result<CompletedSession> {
        let duration_secs = self.elapsed_secs(now);
        let marker = self.marker.take().ok_or(Refusal::NoSessionRunning)?;
        self.store.clear_marker()?;
        Ok(CompletedSession {
            goal_id: marker.goal_id,
            duration_secs,
        })
    }

    /// Forget the session without producing a result.
    pub fn discard(&mut self) -> Result<()> {
        self.marker = None;
        self.store.clear_marker()
    }
}
