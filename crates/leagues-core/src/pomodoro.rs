//! Pomodoro cycle.
//!
//! A countdown state machine that alternates focus and break. Like the
//! session timer it has no thread of its own: the caller invokes `tick()`
//! once per second. Nothing here is persisted; a fresh process always
//! starts idle.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Focus <-> Break
//!   ^______|_________|   (stop)
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomodoroPhase {
    Idle,
    Focus,
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroDurations {
    pub focus_secs: u64,
    pub break_secs: u64,
}

impl PomodoroDurations {
    pub fn from_minutes(focus_minutes: u32, break_minutes: u32) -> Self {
        Self {
            focus_secs: u64::from(focus_minutes).max(1) * 60,
            break_secs: u64::from(break_minutes).max(1) * 60,
        }
    }
}

impl Default for PomodoroDurations {
    fn default() -> Self {
        Self {
            focus_secs: 25 * 60,
            break_secs: 5 * 60,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PomodoroCycle {
    durations: PomodoroDurations,
    phase: PomodoroPhase,
    seconds_remaining: u64,
}

impl PomodoroCycle {
    pub fn new(durations: PomodoroDurations) -> Self {
        Self {
            durations,
            phase: PomodoroPhase::Idle,
            seconds_remaining: durations.focus_secs,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    pub fn durations(&self) -> PomodoroDurations {
        self.durations
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start_focus(&mut self) -> Option<Event> {
        if self.phase != PomodoroPhase::Idle {
            return None;
        }
        Some(self.enter(PomodoroPhase::Focus, false))
    }

    pub fn take_break(&mut self) -> Option<Event> {
        if self.phase != PomodoroPhase::Focus {
            return None;
        }
        Some(self.enter(PomodoroPhase::Break, false))
    }

    pub fn back_to_work(&mut self) -> Option<Event> {
        if self.phase != PomodoroPhase::Break {
            return None;
        }
        Some(self.enter(PomodoroPhase::Focus, false))
    }

    /// Back to idle from any running phase; the countdown shows the focus
    /// length again.
    pub fn stop(&mut self) -> Option<Event> {
        if self.phase == PomodoroPhase::Idle {
            return None;
        }
        Some(self.enter(PomodoroPhase::Idle, false))
    }

    /// Call once per second. Returns the transition event when the
    /// countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.phase == PomodoroPhase::Idle {
            return None;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining > 0 {
            return None;
        }
        let next = match self.phase {
            PomodoroPhase::Focus => PomodoroPhase::Break,
            _ => PomodoroPhase::Focus,
        };
        Some(self.enter(next, true))
    }

    /// Apply `ticks` missed ticks at once, returning every transition.
    pub fn advance(&mut self, ticks: u64) -> Vec<Event> {
        (0..ticks).filter_map(|_| self.tick()).collect()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, to: PomodoroPhase, automatic: bool) -> Event {
        let from = self.phase;
        self.phase = to;
        self.seconds_remaining = match to {
            PomodoroPhase::Break => self.durations.break_secs,
            PomodoroPhase::Focus | PomodoroPhase::Idle => self.durations.focus_secs,
        };
        Event::PomodoroChanged {
            from,
            to,
            seconds_remaining: self.seconds_remaining,
            automatic,
            at: Utc::now(),
        }
    }
}

impl Default for PomodoroCycle {
    fn default() -> Self {
        Self::new(PomodoroDurations::default())
    }
}
