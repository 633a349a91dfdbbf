use crate::domain::model::{Basket, SessionId};
use crate::domain::ports::Session;
use crate::utils::error::{BasketError, Result};
use crate::utils::validation::validate_session_key;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

type SessionEntries = HashMap<SessionId, HashMap<String, String>>;

/// Process-local session storage. Baskets are kept JSON-encoded, the same
/// way they would sit in a real session backend.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<RwLock<SessionEntries>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self, id: SessionId) -> MemorySession {
        MemorySession {
            id,
            entries: Arc::clone(&self.entries),
        }
    }

    pub async fn contains(&self, id: &SessionId, key: &str) -> bool {
        let entries = self.entries.read().await;
        entries
            .get(id)
            .map(|values| values.contains_key(key))
            .unwrap_or(false)
    }

    /// Stores an already-encoded payload, bypassing serialization.
    pub async fn insert_raw(&self, id: &SessionId, key: &str, payload: impl Into<String>) {
        let mut entries = self.entries.write().await;
        entries
            .entry(id.clone())
            .or_default()
            .insert(key.to_string(), payload.into());
    }

    pub async fn clear(&self, id: &SessionId) {
        self.entries.write().await.remove(id);
    }
}

#[derive(Debug, Clone)]
pub struct MemorySession {
    id: SessionId,
    entries: Arc<RwLock<SessionEntries>>,
}

#[async_trait]
impl Session for MemorySession {
    fn id(&self) -> &SessionId {
        &self.id
    }

    async fn get(&self, key: &str) -> Result<Option<Basket>> {
        let entries = self.entries.read().await;
        match entries.get(&self.id).and_then(|values| values.get(key)) {
            Some(payload) => Ok(Some(serde_json::from_str(payload)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, basket: &Basket) -> Result<()> {
        let payload = serde_json::to_string(basket)?;
        let mut entries = self.entries.write().await;
        entries
            .entry(self.id.clone())
            .or_default()
            .insert(key.to_string(), payload);
        Ok(())
    }
}

#[derive(Serialize)]
struct StoredBasketRef<'a> {
    stored_at: DateTime<Utc>,
    basket: &'a Basket,
}

#[derive(Deserialize)]
struct StoredBasket {
    #[allow(dead_code)]
    stored_at: DateTime<Utc>,
    basket: Basket,
}

/// Sessions on disk: `<base>/<session id>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn session(&self, id: SessionId) -> FileSession {
        let dir = self.base_path.join(id.as_str());
        FileSession { id, dir }
    }
}

#[derive(Debug, Clone)]
pub struct FileSession {
    id: SessionId,
    dir: PathBuf,
}

impl FileSession {
    /// Rejects keys that would leave the session directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_session_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

fn session_error(action: &str, path: &Path, e: std::io::Error) -> BasketError {
    BasketError::SessionError {
        message: format!("failed to {} {}: {}", action, path.display(), e),
    }
}

#[async_trait]
impl Session for FileSession {
    fn id(&self) -> &SessionId {
        &self.id
    }

    async fn get(&self, key: &str) -> Result<Option<Basket>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => {
                let stored: StoredBasket = serde_json::from_slice(&data)?;
                Ok(Some(stored.basket))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(session_error("read", &path, e)),
        }
    }

    async fn set(&self, key: &str, basket: &Basket) -> Result<()> {
        let path = self.path_for(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| session_error("create", parent, e))?;
        }

        let data = serde_json::to_vec_pretty(&StoredBasketRef {
            stored_at: Utc::now(),
            basket,
        })?;

        // a reader sees either the previous basket or the new one
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, data)
            .await
            .map_err(|e| session_error("write", &tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| session_error("replace", &path, e))?;

        tracing::debug!("Wrote {} to {}", key, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BasketElement;
    use tempfile::TempDir;

    fn basket() -> Basket {
        let mut basket = Basket::new();
        basket.add_element(BasketElement::new("book", Some(1), 2));
        basket.set_customer_id(Some(7));
        basket
    }

    #[tokio::test]
    async fn test_memory_sessions_are_isolated() {
        let store = MemorySessionStore::new();
        let alice = store.session(SessionId::new("alice").unwrap());
        let bob = store.session(SessionId::new("bob").unwrap());

        alice.set("sonata/basket", &basket()).await.unwrap();

        assert!(alice.get("sonata/basket").await.unwrap().is_some());
        assert!(bob.get("sonata/basket").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_session_reports_undecodable_payload() {
        let store = MemorySessionStore::new();
        let id = SessionId::new("s1").unwrap();
        store.insert_raw(&id, "sonata/basket", "{not json").await;

        let result = store.session(id).get("sonata/basket").await;

        assert!(matches!(result, Err(BasketError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_memory_clear() {
        let store = MemorySessionStore::new();
        let id = SessionId::new("s1").unwrap();
        store.session(id.clone()).set("sonata/basket", &basket()).await.unwrap();

        store.clear(&id).await;

        assert!(!store.contains(&id, "sonata/basket").await);
    }

    #[tokio::test]
    async fn test_file_session_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());
        let session = store.session(SessionId::new("s1").unwrap());

        session.set("sonata/basket", &basket()).await.unwrap();
        let restored = session.get("sonata/basket").await.unwrap().unwrap();

        assert!(dir.path().join("s1/sonata/basket.json").exists());
        assert_eq!(restored.elements().len(), 1);
        assert_eq!(restored.customer_id(), Some(7));
    }

    #[tokio::test]
    async fn test_file_session_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());
        let session = store.session(SessionId::new("nobody").unwrap());

        assert!(session.get("sonata/basket").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_session_rejects_keys_leaving_its_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());
        let attacker = store.session(SessionId::new("attacker").unwrap());

        let written = attacker.set("../victim/sonata/basket", &basket()).await;
        let read = attacker.get("../victim/sonata/basket").await;

        assert!(matches!(
            written,
            Err(BasketError::InvalidConfigValueError { .. })
        ));
        assert!(read.is_err());
        assert!(!dir.path().join("victim").exists());
    }

    #[tokio::test]
    async fn test_file_session_write_leaves_no_temporary_file() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());
        let session = store.session(SessionId::new("s1").unwrap());

        session.set("sonata/basket", &basket()).await.unwrap();
        session.set("sonata/basket", &Basket::new()).await.unwrap();

        let restored = session.get("sonata/basket").await.unwrap().unwrap();
        assert!(restored.is_empty());
        assert!(!dir.path().join("s1/sonata/basket.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_session_backend_failure_is_a_session_error() {
        let dir = TempDir::new().unwrap();
        // the session directory cannot be created below a regular file
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"").unwrap();
        let store = FileSessionStore::new(&blocker);
        let session = store.session(SessionId::new("s1").unwrap());

        let result = session.set("sonata/basket", &basket()).await;

        assert!(matches!(result, Err(BasketError::SessionError { .. })));
    }
}
