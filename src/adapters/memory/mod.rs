//! In-memory storage backend
//!
//! Holds documents and sessions in process memory. Enforces the same id and
//! natural-key uniqueness as the PostgreSQL schema, and can be told to reject a
//! whole bulk call on conflict the way some drivers abort unordered bulk writes.

use crate::adapters::database::traits::{
    BulkInsertFailure, BulkInsertResult, DocumentStore, SessionStore,
};
use crate::config::MemoryBulkMode;
use crate::core::tracker::session::ImportSession;
use crate::domain::{BulkloadError, DocumentId, EntityKind, Result, SessionId, StoredDocument};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Collection {
    documents: HashMap<DocumentId, StoredDocument>,
    natural_keys: HashMap<String, DocumentId>,
}

impl Collection {
    fn conflict(&self, doc: &StoredDocument) -> Option<String> {
        if self.documents.contains_key(&doc.id) {
            return Some(format!("duplicate key: id '{}' already exists", doc.id));
        }
        doc.natural_key.as_ref().and_then(|key| {
            self.natural_keys
                .get(key)
                .map(|existing| format!("duplicate key: '{key}' already stored as {existing}"))
        })
    }

    fn insert(&mut self, doc: StoredDocument) -> std::result::Result<DocumentId, String> {
        if let Some(reason) = self.conflict(&doc) {
            return Err(reason);
        }
        let id = doc.id.clone();
        if let Some(key) = &doc.natural_key {
            self.natural_keys.insert(key.clone(), id.clone());
        }
        self.documents.insert(id.clone(), doc);
        Ok(id)
    }

    fn remove(&mut self, id: &DocumentId) -> bool {
        match self.documents.remove(id) {
            Some(doc) => {
                if let Some(key) = doc.natural_key {
                    self.natural_keys.remove(&key);
                }
                true
            }
            None => false,
        }
    }
}

/// Process-local document and session store
pub struct MemoryStore {
    bulk_mode: MemoryBulkMode,
    collections: RwLock<HashMap<EntityKind, Collection>>,
    sessions: RwLock<HashMap<SessionId, ImportSession>>,
}

impl MemoryStore {
    pub fn new(bulk_mode: MemoryBulkMode) -> Self {
        Self {
            bulk_mode,
            collections: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of every document stored for a kind
    pub async fn documents(&self, kind: EntityKind) -> Vec<StoredDocument> {
        self.collections
            .read()
            .await
            .get(&kind)
            .map(|c| c.documents.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Find the first conflicting document in a batch, against stored data and itself
    fn first_conflict(collection: &Collection, documents: &[StoredDocument]) -> Option<String> {
        let mut ids = HashSet::new();
        let mut keys = HashSet::new();
        for doc in documents {
            if let Some(reason) = collection.conflict(doc) {
                return Some(reason);
            }
            if !ids.insert(&doc.id) {
                return Some(format!("duplicate key: id '{}' repeated in batch", doc.id));
            }
            if let Some(key) = &doc.natural_key {
                if !keys.insert(key) {
                    return Some(format!("duplicate key: '{key}' repeated in batch"));
                }
            }
        }
        None
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MemoryBulkMode::default())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_collection_exists(&self, kind: EntityKind) -> Result<()> {
        self.collections.write().await.entry(kind).or_default();
        Ok(())
    }

    async fn insert_many(
        &self,
        kind: EntityKind,
        documents: Vec<StoredDocument>,
        _timeout: Duration,
    ) -> Result<BulkInsertResult> {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(kind).or_default();

        if self.bulk_mode == MemoryBulkMode::AbortOnConflict {
            if let Some(reason) = Self::first_conflict(collection, &documents) {
                return Err(BulkloadError::Database(format!(
                    "Bulk write aborted for {kind}: {reason}"
                )));
            }
        }

        let mut result = BulkInsertResult::default();
        for doc in documents {
            let id = doc.id.clone();
            match collection.insert(doc) {
                Ok(id) => result.inserted_ids.push(id),
                Err(error) => result.failures.push(BulkInsertFailure {
                    document_id: id,
                    error,
                }),
            }
        }
        Ok(result)
    }

    async fn insert_one(&self, kind: EntityKind, document: StoredDocument) -> Result<DocumentId> {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(kind).or_default();
        if collection.documents.contains_key(&document.id) {
            return Err(BulkloadError::DocumentExists(document.id));
        }
        collection.insert(document).map_err(BulkloadError::Database)
    }

    async fn delete_by_ids(&self, kind: EntityKind, ids: &[DocumentId]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut collections = self.collections.write().await;
        let Some(collection) = collections.get_mut(&kind) else {
            return Ok(0);
        };
        Ok(ids.iter().filter(|id| collection.remove(id)).count() as u64)
    }

    async fn delete_all(&self, kind: EntityKind) -> Result<u64> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .remove(&kind)
            .map(|c| c.documents.len() as u64)
            .unwrap_or(0))
    }

    async fn count(&self, kind: EntityKind) -> Result<u64> {
        Ok(self
            .collections
            .read()
            .await
            .get(&kind)
            .map(|c| c.documents.len() as u64)
            .unwrap_or(0))
    }

    fn database_name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn ensure_session_collection_exists(&self) -> Result<()> {
        Ok(())
    }

    async fn save_session(&self, session: &ImportSession) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn list_sessions(&self, kind: Option<EntityKind>) -> Result<Vec<ImportSession>> {
        let mut sessions: Vec<ImportSession> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.matches(kind, None))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.import_date.cmp(&a.import_date));
        Ok(sessions)
    }

    async fn delete_sessions(&self, sessions: &[ImportSession]) -> Result<u64> {
        let mut stored = self.sessions.write().await;
        Ok(sessions
            .iter()
            .filter(|s| stored.remove(&s.session_id).is_some())
            .count() as u64)
    }
}
