use std::rc::Rc;

use serde_json::{Map, Value};

use super::{BackendKind, DocumentStore, GoalBackend};
use crate::error::{Result, StorageError};
use crate::model::Snapshot;

/// Signed-in backend: one document per user holding
/// `{ goals, currentGoalId }`, written with merge semantics.
#[derive(Clone)]
pub struct RemoteBackend {
    docs: Rc<dyn DocumentStore>,
    user_id: String,
}

impl RemoteBackend {
    pub fn new(docs: Rc<dyn DocumentStore>, user_id: impl Into<String>) -> Self {
        Self {
            docs,
            user_id: user_id.into(),
        }
    }
}

impl GoalBackend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote {
            user_id: self.user_id.clone(),
        }
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        let Some(doc) = self.docs.get(&self.user_id)? else {
            return Ok(None);
        };
        let snapshot = serde_json::from_value(doc).map_err(|e| StorageError::Corrupt {
            key: format!("document {}", self.user_id),
            message: e.to_string(),
        })?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let mut fields = Map::new();
        fields.insert("goals".into(), serde_json::to_value(&snapshot.goals)?);
        fields.insert(
            "currentGoalId".into(),
            serde_json::to_value(&snapshot.current_goal_id)?,
        );
        self.docs.merge(&self.user_id, &fields)
    }

    fn clear(&self) -> Result<()> {
        self.docs
            .replace(&self.user_id, &Value::Object(Map::new()))
    }
}
