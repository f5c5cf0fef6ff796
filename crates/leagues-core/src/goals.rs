//! Goal Store.
//!
//! Owns the ordered goal list and the current-goal pointer. Every mutation
//! goes through here and is written straight through to the attached
//! [`GoalBackend`]; the store never reads the backend back except on
//! `reload`/`attach`.

use chrono::Utc;

use crate::error::Result;
use crate::events::Event;
use crate::model::{now_ms, Goal, Log, Snapshot, STARTER_GOAL_NAME};
use crate::storage::{BackendKind, GoalBackend};

pub struct GoalStore {
    goals: Vec<Goal>,
    current_goal_id: Option<String>,
    backend: Box<dyn GoalBackend>,
}

impl GoalStore {
    /// Load from `backend` and make sure a starter goal exists.
    pub fn open(backend: Box<dyn GoalBackend>) -> Result<Self> {
        let mut store = Self::empty(backend);
        store.reload()?;
        store.bootstrap()?;
        Ok(store)
    }

    /// A store with nothing loaded yet.
    pub fn empty(backend: Box<dyn GoalBackend>) -> Self {
        Self {
            goals: Vec::new(),
            current_goal_id: None,
            backend,
        }
    }

    /// Swap the persistence target and load from it.
    pub fn attach(&mut self, backend: Box<dyn GoalBackend>) -> Result<()> {
        tracing::debug!(kind = ?backend.kind(), "attaching goal backend");
        self.backend = backend;
        self.reload()
    }

    /// Replace in-memory state with whatever the backend holds.
    pub fn reload(&mut self) -> Result<()> {
        let snapshot = self.backend.load()?.unwrap_or_default();
        self.goals = snapshot.goals;
        self.current_goal_id = snapshot.current_goal_id;
        Ok(())
    }

    /// Create the starter goal when the list is empty, and repoint a
    /// missing or dangling current pointer at the first goal.
    pub fn bootstrap(&mut self) -> Result<Option<Event>> {
        if self.goals.is_empty() {
            tracing::info!("no goals found, creating starter goal");
            return self.create(STARTER_GOAL_NAME).map(Some);
        }
        if self.current().is_none() {
            self.current_goal_id = self.goals.first().map(|g| g.id.clone());
            self.persist()?;
        }
        Ok(None)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn list(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_goal_id.as_deref()
    }

    pub fn current(&self) -> Option<&Goal> {
        self.current_goal_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            goals: self.goals.clone(),
            current_goal_id: self.current_goal_id.clone(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn create(&mut self, name: &str) -> Result<Event> {
        self.create_at(name, now_ms())
    }

    /// Append a new goal and select it.
    pub fn create_at(&mut self, name: &str, now: i64) -> Result<Event> {
        let goal = Goal::new(name, now);
        let event = Event::GoalCreated {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            at: Utc::now(),
        };
        self.current_goal_id = Some(goal.id.clone());
        self.goals.push(goal);
        self.persist()?;
        Ok(event)
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<Option<Event>> {
        let Some(goal) = self.goals.iter_mut().find(|g| g.id == id) else {
            return Ok(None);
        };
        goal.name = name.to_string();
        self.persist()?;
        Ok(Some(Event::GoalRenamed {
            goal_id: id.to_string(),
            name: name.to_string(),
            at: Utc::now(),
        }))
    }

    /// Remove a goal. Refuses (returns `None`) when it is the last one.
    pub fn delete(&mut self, id: &str) -> Result<Option<Event>> {
        if self.goals.len() <= 1 {
            return Ok(None);
        }
        let Some(pos) = self.goals.iter().position(|g| g.id == id) else {
            return Ok(None);
        };
        self.goals.remove(pos);
        if self.current_goal_id.as_deref() == Some(id) {
            self.current_goal_id = self.goals.first().map(|g| g.id.clone());
        }
        self.persist()?;
        Ok(Some(Event::GoalDeleted {
            goal_id: id.to_string(),
            at: Utc::now(),
        }))
    }

    /// Point at `id`. Unknown ids are ignored.
    pub fn select(&mut self, id: &str) -> Result<Option<Event>> {
        if self.get(id).is_none() {
            return Ok(None);
        }
        self.current_goal_id = Some(id.to_string());
        self.persist()?;
        Ok(Some(Event::GoalSelected {
            goal_id: id.to_string(),
            at: Utc::now(),
        }))
    }

    pub fn append_log(&mut self, goal_id: &str, duration_sec: u64, note: &str) -> Result<bool> {
        self.append_log_at(goal_id, duration_sec, note, now_ms())
    }

    /// Add `duration_sec` to the goal's total and record a log. Returns
    /// `false` when the goal does not exist.
    pub fn append_log_at(
        &mut self,
        goal_id: &str,
        duration_sec: u64,
        note: &str,
        now: i64,
    ) -> Result<bool> {
        let Some(goal) = self.goals.iter_mut().find(|g| g.id == goal_id) else {
            return Ok(false);
        };
        goal.total_time += duration_sec;
        goal.logs.push(Log {
            timestamp: now,
            duration_sec,
            note: note.to_string(),
        });
        self.persist()?;
        Ok(true)
    }

    /// Drop every goal and the backend record. The store is left empty;
    /// call `bootstrap` to get a starter goal back.
    pub fn reset_all(&mut self) -> Result<Event> {
        tracing::warn!(kind = ?self.backend.kind(), "resetting all goals");
        self.backend.clear()?;
        self.goals.clear();
        self.current_goal_id = None;
        Ok(Event::EverythingReset { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn persist(&self) -> Result<()> {
        self.backend.save(&self.snapshot())
    }
}
