//! Per-user document stores.
//!
//! A document is a JSON object keyed by user id. Writes merge top-level
//! fields into the existing document; last writer wins.

use std::path::{Path, PathBuf};

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde_json::{Map, Value};
use url::Url;

use crate::error::{RemoteError, Result};

pub trait DocumentStore {
    /// `None` when the user has no document yet.
    fn get(&self, user_id: &str) -> Result<Option<Value>>;

    /// Merge `fields` into the document, creating it when absent.
    fn merge(&self, user_id: &str, fields: &Map<String, Value>) -> Result<()>;

    /// Replace the whole document.
    fn replace(&self, user_id: &str, document: &Value) -> Result<()>;
}

/// Documents served at `{endpoint}/{collection}/{user_id}`.
///
/// `GET` reads (404 means absent), `PATCH` merges, `PUT` replaces.
pub struct HttpDocumentStore {
    base: Url,
    collection: String,
    token: Option<String>,
    client: Client,
}

impl HttpDocumentStore {
    pub fn new(endpoint: &str, collection: &str, token: Option<String>) -> Result<Self> {
        let base =
            Url::parse(endpoint).map_err(|_| RemoteError::InvalidEndpoint(endpoint.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(RemoteError::InvalidEndpoint(endpoint.to_string()).into());
        }
        Ok(Self {
            base,
            collection: collection.to_string(),
            token,
            client: Client::new(),
        })
    }

    fn document_url(&self, user_id: &str) -> Result<Url, RemoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidEndpoint(self.base.to_string()))?
            .pop_if_empty()
            .push(&self.collection)
            .push(user_id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn fetch(&self, user_id: &str) -> Result<Option<Value>, RemoteError> {
        let url = self.document_url(user_id)?;
        tracing::debug!(%url, "fetching remote document");
        let resp = self.authorize(self.client.get(url.clone())).send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(RemoteError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
                body: resp.text().unwrap_or_default(),
            });
        }
        Ok(Some(resp.json()?))
    }

    fn write(
        &self,
        user_id: &str,
        method: reqwest::Method,
        body: &Value,
    ) -> Result<(), RemoteError> {
        let url = self.document_url(user_id)?;
        tracing::debug!(%url, %method, "writing remote document");
        let resp = self
            .authorize(self.client.request(method, url.clone()))
            .json(body)
            .send()?;
        if !resp.status().is_success() {
            return Err(RemoteError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
                body: resp.text().unwrap_or_default(),
            });
        }
        Ok(())
    }
}

impl DocumentStore for HttpDocumentStore {
    fn get(&self, user_id: &str) -> Result<Option<Value>> {
        Ok(self.fetch(user_id)?)
    }

    fn merge(&self, user_id: &str, fields: &Map<String, Value>) -> Result<()> {
        Ok(self.write(user_id, reqwest::Method::PATCH, &Value::Object(fields.clone()))?)
    }

    fn replace(&self, user_id: &str, document: &Value) -> Result<()> {
        Ok(self.write(user_id, reqwest::Method::PUT, document)?)
    }
}

/// Documents kept as `{dir}/{user_id}.json`, the id percent-encoded so
/// distinct ids never share a file. Used when no endpoint is configured.
pub struct FileDocumentStore {
    dir: PathBuf,
}

impl FileDocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(user_id)))
    }

    fn read(path: &Path) -> Result<Option<Value>, RemoteError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(file_error(path, e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| file_error(path, e))
    }

    fn write(&self, path: &Path, document: &Value) -> Result<(), RemoteError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| file_error(&self.dir, e))?;
        let content = serde_json::to_string_pretty(document).map_err(|e| file_error(path, e))?;
        std::fs::write(path, content).map_err(|e| file_error(path, e))
    }
}

fn file_error(path: &Path, err: impl std::fmt::Display) -> RemoteError {
    RemoteError::File {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

impl DocumentStore for FileDocumentStore {
    fn get(&self, user_id: &str) -> Result<Option<Value>> {
        Ok(Self::read(&self.path_for(user_id))?)
    }

    fn merge(&self, user_id: &str, fields: &Map<String, Value>) -> Result<()> {
        let path = self.path_for(user_id);
        let mut document = match Self::read(&path)? {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for (key, value) in fields {
            document.insert(key.clone(), value.clone());
        }
        Ok(self.write(&path, &Value::Object(document))?)
    }

    fn replace(&self, user_id: &str, document: &Value) -> Result<()> {
        Ok(self.write(&self.path_for(user_id), document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn file_store_merges_top_level_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());

        assert!(store.get("u1").unwrap().is_none());
        store
            .merge("u1", &fields(json!({"goals": [], "theme": "dark"})))
            .unwrap();
        store
            .merge("u1", &fields(json!({"goals": [1], "currentGoalId": "g"})))
            .unwrap();

        let doc = store.get("u1").unwrap().unwrap();
        assert_eq!(doc, json!({"goals": [1], "theme": "dark", "currentGoalId": "g"}));
    }

    #[test]
    fn file_store_replace_wipes_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());
        store.merge("u1", &fields(json!({"goals": [1]}))).unwrap();
        store.replace("u1", &json!({})).unwrap();
        assert_eq!(store.get("u1").unwrap(), Some(json!({})));
    }

    #[test]
    fn file_names_stay_inside_dir() {
        let store = FileDocumentStore::new("/tmp/docs");
        let path = store.path_for("../evil/id");
        assert_eq!(path, PathBuf::from("/tmp/docs/..%2Fevil%2Fid.json"));
        assert_eq!(path.parent(), Some(Path::new("/tmp/docs")));
    }

    #[test]
    fn similar_user_ids_get_separate_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path());
        assert_ne!(store.path_for("a.b"), store.path_for("a_b"));
        assert_ne!(store.path_for("a/b"), store.path_for("a_b"));

        store
            .replace("a.b", &serde_json::json!({"goals": ["secret"]}))
            .unwrap();
        assert!(store.get("a_b").unwrap().is_none());
        assert!(store.get("a.b").unwrap().is_some());
    }

    #[test]
    fn document_url_escapes_segments() {
        let store = HttpDocumentStore::new("https://example.com/api/", "users", None).unwrap();
        let url = store.document_url("a b").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/users/a%20b");
    }

    #[test]
    fn rejects_non_base_endpoints() {
        assert!(HttpDocumentStore::new("mailto:me@example.com", "users", None).is_err());
        assert!(HttpDocumentStore::new("not a url", "users", None).is_err());
    }

    #[test]
    fn http_get_missing_document_is_none() {
        let mut server = mockito::Server::new();
        let mock = server.mock("GET", "/users/u1").with_status(404).create();

        let store = HttpDocumentStore::new(&server.url(), "users", None).unwrap();
        assert!(store.get("u1").unwrap().is_none());
        mock.assert();
    }

    #[test]
    fn http_merge_patches_with_bearer_token() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("PATCH", "/users/u1")
            .match_header("authorization", "Bearer secret")
            .match_body(mockito::Matcher::Json(json!({"currentGoalId": "g1"})))
            .with_status(200)
            .create();

        let store =
            HttpDocumentStore::new(&server.url(), "users", Some("secret".into())).unwrap();
        store
            .merge("u1", &fields(json!({"currentGoalId": "g1"})))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn http_error_status_is_reported() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/users/u1")
            .with_status(500)
            .with_body("boom")
            .create();

        let store = HttpDocumentStore::new(&server.url(), "users", None).unwrap();
        let err = store.get("u1").unwrap_err();
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }
}
