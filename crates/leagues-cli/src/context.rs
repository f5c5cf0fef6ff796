//! Wiring shared by every command: configuration, the local store, the
//! document store for signed-in users, and the identity.

use std::error::Error;
use std::rc::Rc;

use leagues_core::model::now_ms;
use leagues_core::storage::data_dir;
use leagues_core::{
    App, Config, DocumentStore, FileDocumentStore, HttpDocumentStore, IdentityProvider,
    LocalStore, StoredIdentity,
};

pub struct Context {
    pub app: App,
    pub identity: StoredIdentity,
}

impl Context {
    pub fn open() -> Result<Self, Box<dyn Error>> {
        Self::open_with(Config::load()?, None)
    }

    /// Open with an explicit config. `token` overrides the stored bearer
    /// token, for a sign-in that has not been persisted yet.
    pub fn open_with(config: Config, token: Option<String>) -> Result<Self, Box<dyn Error>> {
        let local = LocalStore::open()?;
        let identity = StoredIdentity::new(local.clone());
        let token = match token {
            Some(token) => Some(token),
            None if !config.remote.endpoint.is_empty() => identity.token()?,
            None => None,
        };
        let docs = document_store(&config, token)?;
        let user = identity.current_user()?;
        let app = App::open(config, local, docs, user, now_ms())?;
        Ok(Self { app, identity })
    }
}

fn document_store(
    config: &Config,
    token: Option<String>,
) -> Result<Rc<dyn DocumentStore>, Box<dyn Error>> {
    if config.remote.endpoint.is_empty() {
        let dir = data_dir()?.join("remote");
        tracing::debug!(dir = %dir.display(), "using file document store");
        return Ok(Rc::new(FileDocumentStore::new(dir)));
    }
    tracing::debug!(endpoint = %config.remote.endpoint, "using http document store");
    Ok(Rc::new(HttpDocumentStore::new(
        &config.remote.endpoint,
        &config.remote.collection,
        token,
    )?))
}
