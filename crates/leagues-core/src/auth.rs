//! Auth Gate.
//!
//! The identity provider itself is an external collaborator; the core only
//! needs to know who is signed in (if anyone) and to be told when that
//! changes. [`AuthGate::observe`] is that hook: it picks the persistence
//! target for the Goal Store and performs the one-time migration of local
//! goals into a user's fresh remote document.

use std::rc::Rc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::Event;
use crate::goals::GoalStore;
use crate::storage::local::KEY_AUTH_USER;
use crate::storage::{
    keyring_store, DocumentStore, GoalBackend, LocalBackend, LocalStore, RemoteBackend,
};

/// What the core consumes from an identity provider.
pub trait IdentityProvider {
    /// Opaque id of the signed-in user, if any.
    fn current_user(&self) -> Result<Option<String>>;

    fn sign_in(&mut self, user_id: &str, token: Option<&str>) -> Result<()>;

    fn sign_out(&mut self) -> Result<()>;

    /// Bearer token for the remote document store.
    fn token(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignedInUser {
    user_id: String,
    #[serde(default)]
    has_token: bool,
}

/// Identity kept on this machine: the user id in the local store, the
/// token (when one was given) in the OS keyring.
pub struct StoredIdentity {
    store: LocalStore,
}

impl StoredIdentity {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    fn load(&self) -> Result<Option<SignedInUser>> {
        match self.store.kv_get(KEY_AUTH_USER)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn token_key(user_id: &str) -> String {
        format!("token:{user_id}")
    }
}

impl IdentityProvider for StoredIdentity {
    fn current_user(&self) -> Result<Option<String>> {
        Ok(self.load()?.map(|u| u.user_id))
    }

    fn sign_in(&mut self, user_id: &str, token: Option<&str>) -> Result<()> {
        if let Some(token) = token {
            keyring_store::set(&Self::token_key(user_id), token)?;
        }
        let user = SignedInUser {
            user_id: user_id.to_string(),
            has_token: token.is_some(),
        };
        self.store.kv_set(KEY_AUTH_USER, &serde_json::to_string(&user)?)?;
        tracing::info!(user_id, "signed in");
        Ok(())
    }

    fn sign_out(&mut self) -> Result<()> {
        if let Some(user) = self.load()? {
            if user.has_token {
                keyring_store::delete(&Self::token_key(&user.user_id))?;
            }
            tracing::info!(user_id = %user.user_id, "signed out");
        }
        self.store.kv_delete(KEY_AUTH_USER)
    }

    fn token(&self) -> Result<Option<String>> {
        match self.load()? {
            Some(user) if user.has_token => {
                Ok(keyring_store::get(&Self::token_key(&user.user_id))?)
            }
            _ => Ok(None),
        }
    }
}

/// Chooses where goals are persisted for the current identity.
pub struct AuthGate {
    local: LocalStore,
    docs: Rc<dyn DocumentStore>,
    user: Option<String>,
    observed: bool,
}

impl AuthGate {
    pub fn new(local: LocalStore, docs: Rc<dyn DocumentStore>) -> Self {
        Self {
            local,
            docs,
            user: None,
            observed: false,
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// React to the signed-in identity. Does nothing when it has not
    /// changed since the last call.
    ///
    /// Signed out, goals live in the local store. Signed in, they live in
    /// the user's remote document; if that document does not exist yet and
    /// there are local goals, they are copied into it first. Local data is
    /// never cleared by this.
    pub fn observe(
        &mut self,
        user: Option<String>,
        goals: &mut GoalStore,
    ) -> Result<Option<Event>> {
        if self.observed && self.user == user {
            return Ok(None);
        }

        let mut migrated = false;
        let backend: Box<dyn GoalBackend> = match &user {
            None => Box::new(LocalBackend::new(self.local.clone())),
            Some(user_id) => {
                let remote = RemoteBackend::new(self.docs.clone(), user_id.clone());
                if remote.load()?.is_none() {
                    if let Some(local) = self.local.load_snapshot()? {
                        if !local.goals.is_empty() {
                            tracing::info!(
                                user_id = %user_id,
                                goals = local.goals.len(),
                                "migrating local goals to new remote document"
                            );
                            remote.save(&local)?;
                            migrated = true;
                        }
                    }
                }
                Box::new(remote)
            }
        };

        goals.attach(backend)?;
        goals.bootstrap()?;
        self.user = user;
        self.observed = true;

        Ok(Some(Event::BackendSwitched {
            user_id: self.user.clone(),
            migrated,
            at: Utc::now(),
        }))
    }
}
