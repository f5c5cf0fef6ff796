//! The user-facing actions.
//!
//! [`App`] owns every component and is the only place where they meet:
//! prompts and confirmations, the pomodoro/session pause coordination,
//! and identity changes all go through here.

use std::rc::Rc;

use serde::Serialize;

use crate::auth::{AuthGate, IdentityProvider};
use crate::error::{Refusal, Result};
use crate::events::Event;
use crate::goals::GoalStore;
use crate::model::{format_hms, format_leagues, LeagueProgress};
use crate::pomodoro::{PomodoroCycle, PomodoroPhase};
use crate::prompt::Prompter;
use crate::session::{SessionState, SessionTimer};
use crate::storage::{Config, DocumentStore, LocalBackend, LocalStore};

pub const PROMPT_NEW_GOAL: &str = "New goal name:";
pub const PROMPT_RENAME_GOAL: &str = "Rename goal:";
pub const CONFIRM_DELETE_GOAL: &str = "Delete this goal?";
pub const PROMPT_ACCOMPLISHMENT: &str = "What did you accomplish?";
pub const CONFIRM_RESET: &str = "Delete ALL goals and logs?";

/// Everything a front end shows on its main screen.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub user_id: Option<String>,
    pub goal_id: Option<String>,
    pub goal_name: Option<String>,
    pub total_time: u64,
    /// Stored total plus the running session, as `HH:MM:SS`.
    pub live_total: String,
    pub leagues: String,
    pub progress: LeagueProgress,
    pub session: SessionState,
    pub session_goal_id: Option<String>,
    pub elapsed_secs: u64,
    pub elapsed: String,
    pub pomodoro: PomodoroPhase,
    pub pomodoro_remaining_secs: u64,
}

pub struct App {
    config: Config,
    local: LocalStore,
    gate: AuthGate,
    goals: GoalStore,
    session: SessionTimer,
    pomodoro: PomodoroCycle,
}

impl App {
    /// Load goals for `user` (migrating on a first sign-in), bootstrap a
    /// starter goal if needed, and resume any persisted session.
    ///
    /// The pomodoro cycle always starts idle, so a session still paused by
    /// an interrupted break is resumed at `now`.
    pub fn open(
        config: Config,
        local: LocalStore,
        docs: Rc<dyn DocumentStore>,
        user: Option<String>,
        now: i64,
    ) -> Result<Self> {
        let mut goals = GoalStore::empty(Box::new(LocalBackend::new(local.clone())));
        let mut gate = AuthGate::new(local.clone(), docs);
        gate.observe(user, &mut goals)?;

        let mut session = SessionTimer::new(local.clone());
        if let Some(event) = session.resume(&goals, now)? {
            tracing::debug!(?event, "resumed session");
        }
        if session.state() == SessionState::Paused {
            tracing::info!("ending pause left over from an interrupted break");
            session.unpause(now)?;
        }

        let pomodoro = PomodoroCycle::new(config.pomodoro_durations());
        Ok(Self {
            config,
            local,
            gate,
            goals,
            session,
            pomodoro,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn goals(&self) -> &GoalStore {
        &self.goals
    }

    pub fn session(&self) -> &SessionTimer {
        &self.session
    }

    pub fn pomodoro(&self) -> &PomodoroCycle {
        &self.pomodoro
    }

    pub fn user(&self) -> Option<&str> {
        self.gate.user()
    }

    pub fn status(&self, now: i64) -> Status {
        let current = self.goals.current();
        let total_time = current.map(|g| g.total_time).unwrap_or(0);
        let elapsed_secs = self.session.elapsed_secs(now);
        let running_here =
            self.session.goal_id().is_some() && self.session.goal_id() == self.goals.current_id();
        let live = total_time + if running_here { elapsed_secs } else { 0 };

        Status {
            user_id: self.user().map(str::to_string),
            goal_id: current.map(|g| g.id.clone()),
            goal_name: current.map(|g| g.name.clone()),
            total_time,
            live_total: format_hms(live),
            leagues: format_leagues(live),
            progress: LeagueProgress::for_secs(live),
            session: self.session.state(),
            session_goal_id: self.session.goal_id().map(str::to_string),
            elapsed_secs,
            elapsed: format_hms(elapsed_secs),
            pomodoro: self.pomodoro.phase(),
            pomodoro_remaining_secs: self.pomodoro.seconds_remaining(),
        }
    }

    // ── Goals ────────────────────────────────────────────────────────

    pub fn new_goal(&mut self, prompter: &mut dyn Prompter) -> Result<Option<Event>> {
        let Some(name) = ask_trimmed(prompter, PROMPT_NEW_GOAL, None) else {
            return Ok(None);
        };
        self.goals.create(&name).map(Some)
    }

    pub fn rename_goal(&mut self, prompter: &mut dyn Prompter) -> Result<Option<Event>> {
        let current = self.goals.current().ok_or(Refusal::NoGoalSelected)?;
        let (id, old_name) = (current.id.clone(), current.name.clone());

        let Some(name) = ask_trimmed(prompter, PROMPT_RENAME_GOAL, Some(&old_name)) else {
            return Ok(None);
        };
        if name == old_name {
            return Ok(None);
        }
        self.goals.rename(&id, &name)
    }

    /// Delete the current goal after confirmation. A session running on
    /// it is dropped with it.
    pub fn delete_goal(&mut self, prompter: &mut dyn Prompter) -> Result<Option<Event>> {
        if self.goals.list().len() <= 1 {
            return Err(Refusal::LastGoal.into());
        }
        let id = self
            .goals
            .current_id()
            .ok_or(Refusal::NoGoalSelected)?
            .to_string();
        if !prompter.confirm(CONFIRM_DELETE_GOAL) {
            return Ok(None);
        }

        let event = self.goals.delete(&id)?;
        if event.is_some() && self.session.goal_id() == Some(id.as_str()) {
            tracing::warn!(goal_id = %id, "dropping session of deleted goal");
            self.session.discard()?;
        }
        Ok(event)
    }

    /// Select by id, or by exact name when no id matches.
    pub fn select_goal(&mut self, id_or_name: &str) -> Result<Option<Event>> {
        let Some(id) = self.resolve_goal(id_or_name) else {
            return Ok(None);
        };
        if let Some(running) = self.session.goal_id() {
            if running != id {
                return Err(Refusal::SessionRunning.into());
            }
        }
        self.goals.select(&id)
    }

    fn resolve_goal(&self, id_or_name: &str) -> Option<String> {
        let goals = self.goals.list();
        goals
            .iter()
            .find(|g| g.id == id_or_name)
            .or_else(|| goals.iter().find(|g| g.name == id_or_name))
            .map(|g| g.id.clone())
    }

    // ── Session ──────────────────────────────────────────────────────

    pub fn start_session(&mut self, now: i64) -> Result<Event> {
        self.session.start(&self.goals, now)
    }

    /// Stop the session, ask what was accomplished, and log it when it
    /// lasted at least a second.
    pub fn stop_session(&mut self, prompter: &mut dyn Prompter, now: i64) -> Result<Event> {
        let done = self.session.stop(now)?;
        let note = prompter
            .ask(PROMPT_ACCOMPLISHMENT, None)
            .map(|n| n.trim().to_string())
            .unwrap_or_default();

        let logged = done.duration_secs > 0
            && self
                .goals
                .append_log_at(&done.goal_id, done.duration_secs, &note, now)?;

        Ok(Event::SessionStopped {
            goal_id: done.goal_id,
            duration_secs: done.duration_secs,
            logged,
            at: chrono::Utc::now(),
        })
    }

    // ── Pomodoro ─────────────────────────────────────────────────────

    pub fn start_focus(&mut self, now: i64) -> Result<Vec<Event>> {
        let event = self.pomodoro.start_focus();
        self.coordinate(event.into_iter().collect(), now)
    }

    pub fn take_break(&mut self, now: i64) -> Result<Vec<Event>> {
        let event = self.pomodoro.take_break();
        self.coordinate(event.into_iter().collect(), now)
    }

    pub fn back_to_work(&mut self, now: i64) -> Result<Vec<Event>> {
        let event = self.pomodoro.back_to_work();
        self.coordinate(event.into_iter().collect(), now)
    }

    pub fn stop_pomodoro(&mut self, now: i64) -> Result<Vec<Event>> {
        let event = self.pomodoro.stop();
        self.coordinate(event.into_iter().collect(), now)
    }

    /// One second of pomodoro countdown.
    pub fn tick(&mut self, now: i64) -> Result<Vec<Event>> {
        let event = self.pomodoro.tick();
        self.coordinate(event.into_iter().collect(), now)
    }

    /// Follow pomodoro phase changes with session pauses. Breaks pause
    /// only when `pomodoro.pause_session_on_break` is set; entering focus
    /// or idle always ends a pause.
    fn coordinate(&mut self, mut events: Vec<Event>, now: i64) -> Result<Vec<Event>> {
        let pause_on_break = self.config.pomodoro.pause_session_on_break;
        let mut follow_ups = Vec::new();
        for event in &events {
            if let Event::PomodoroChanged { to, .. } = event {
                let follow_up = match to {
                    PomodoroPhase::Break if pause_on_break => self.session.pause(now)?,
                    PomodoroPhase::Break => None,
                    PomodoroPhase::Focus | PomodoroPhase::Idle => self.session.unpause(now)?,
                };
                follow_ups.extend(follow_up);
            }
        }
        events.extend(follow_ups);
        Ok(events)
    }

    // ── Identity ─────────────────────────────────────────────────────

    pub fn sign_in(
        &mut self,
        provider: &mut dyn IdentityProvider,
        user_id: &str,
        token: Option<&str>,
    ) -> Result<Option<Event>> {
        provider.sign_in(user_id, token)?;
        self.identity_changed(provider)
    }

    pub fn sign_out(&mut self, provider: &mut dyn IdentityProvider) -> Result<Option<Event>> {
        provider.sign_out()?;
        self.identity_changed(provider)
    }

    fn identity_changed(&mut self, provider: &dyn IdentityProvider) -> Result<Option<Event>> {
        let user = provider.current_user()?;
        self.gate.observe(user, &mut self.goals)
    }

    // ── Reset ────────────────────────────────────────────────────────

    /// Wipe every goal, log and marker after confirmation, locally and in
    /// the signed-in document, then recreate the starter goal.
    pub fn reset_everything(&mut self, prompter: &mut dyn Prompter) -> Result<Option<Event>> {
        if !prompter.confirm(CONFIRM_RESET) {
            return Ok(None);
        }
        self.session.discard()?;
        self.pomodoro.stop();
        let event = self.goals.reset_all()?;
        self.local.clear_app_data()?;
        self.goals.bootstrap()?;
        Ok(Some(event))
    }
}

fn ask_trimmed(
    prompter: &mut dyn Prompter,
    message: &str,
    default: Option<&str>,
) -> Option<String> {
    prompter
        .ask(message, default)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
