//! Session queries and scoped cleanup
//!
//! Works across runs: lists sessions, unions the ids they recorded, and deletes
//! exactly those documents.

use super::session::ImportSession;
use crate::adapters::database::traits::{DocumentStore, SessionStore};
use crate::domain::{DocumentId, EntityKind, ImportType, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Counts returned by a scoped clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearResult {
    pub documents_deleted: u64,
    pub sessions_deleted: u64,
}

/// Query and cleanup surface over persisted import sessions
pub struct SessionManager {
    documents: Arc<dyn DocumentStore>,
    sessions: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(documents: Arc<dyn DocumentStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            documents,
            sessions,
        }
    }

    /// All sessions, optionally restricted to one entity kind
    pub async fn list_sessions(&self, kind: Option<EntityKind>) -> Result<Vec<ImportSession>> {
        self.sessions.list_sessions(kind).await
    }

    /// De-duplicated union of ids recorded by the matching sessions
    pub async fn imported_ids(
        &self,
        kind: EntityKind,
        import_type: Option<ImportType>,
    ) -> Result<BTreeSet<DocumentId>> {
        let sessions = self.matching_sessions(kind, import_type).await?;
        Ok(union_ids(&sessions))
    }

    /// Delete only the documents recorded by matching sessions, then those sessions
    ///
    /// Documents the importer didn't create are never touched. With no recorded ids,
    /// no document delete is issued at all.
    pub async fn clear_imported_data(
        &self,
        kind: EntityKind,
        import_type: Option<ImportType>,
    ) -> Result<ClearResult> {
        let sessions = self.matching_sessions(kind, import_type).await?;
        if sessions.is_empty() {
            tracing::info!(entity_kind = %kind, "No import sessions to clear");
            return Ok(ClearResult::default());
        }

        let ids: Vec<DocumentId> = union_ids(&sessions).into_iter().collect();
        let documents_deleted = if ids.is_empty() {
            0
        } else {
            self.documents.delete_by_ids(kind, &ids).await?
        };

        let sessions_deleted = self.sessions.delete_sessions(&sessions).await?;

        tracing::info!(
            entity_kind = %kind,
            import_type = ?import_type,
            tracked_ids = ids.len(),
            documents_deleted,
            sessions_deleted,
            "Cleared imported data"
        );

        Ok(ClearResult {
            documents_deleted,
            sessions_deleted,
        })
    }

    async fn matching_sessions(
        &self,
        kind: EntityKind,
        import_type: Option<ImportType>,
    ) -> Result<Vec<ImportSession>> {
        Ok(self
            .sessions
            .list_sessions(Some(kind))
            .await?
            .into_iter()
            .filter(|s| s.matches(Some(kind), import_type))
            .collect())
    }
}

fn union_ids(sessions: &[ImportSession]) -> BTreeSet<DocumentId> {
    sessions
        .iter()
        .flat_map(|s| s.imported_ids.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::config::MemoryBulkMode;

    fn session_with(kind: EntityKind, import_type: ImportType, ids: &[&str]) -> ImportSession {
        let mut session = ImportSession::new(kind, import_type, None);
        for id in ids {
            session.record(DocumentId::new(*id).unwrap());
        }
        session
    }

    #[tokio::test]
    async fn test_imported_ids_union_deduplicates() {
        let store = Arc::new(MemoryStore::new(MemoryBulkMode::Continue));
        store
            .save_session(&session_with(EntityKind::Users, ImportType::Bulk, &["a", "b"]))
            .await
            .unwrap();
        store
            .save_session(&session_with(EntityKind::Users, ImportType::Seed, &["b", "c"]))
            .await
            .unwrap();
        store
            .save_session(&session_with(EntityKind::Organizations, ImportType::Bulk, &["z"]))
            .await
            .unwrap();

        let manager = SessionManager::new(store.clone(), store);

        let all = manager.imported_ids(EntityKind::Users, None).await.unwrap();
        assert_eq!(all.len(), 3);

        let seeded = manager
            .imported_ids(EntityKind::Users, Some(ImportType::Seed))
            .await
            .unwrap();
        let seeded: Vec<&str> = seeded.iter().map(|id| id.as_str()).collect();
        assert_eq!(seeded, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_clear_without_sessions_is_a_no_op() {
        let store = Arc::new(MemoryStore::new(MemoryBulkMode::Continue));
        let manager = SessionManager::new(store.clone(), store);

        let result = manager
            .clear_imported_data(EntityKind::Configurations, None)
            .await
            .unwrap();
        assert_eq!(result, ClearResult::default());
    }

    #[tokio::test]
    async fn test_clear_removes_empty_sessions() {
        let store = Arc::new(MemoryStore::new(MemoryBulkMode::Continue));
        store
            .save_session(&session_with(EntityKind::ActivityLogs, ImportType::Bulk, &[]))
            .await
            .unwrap();
        let manager = SessionManager::new(store.clone(), store.clone());

        let result = manager
            .clear_imported_data(EntityKind::ActivityLogs, None)
            .await
            .unwrap();
        assert_eq!(result.documents_deleted, 0);
        assert_eq!(result.sessions_deleted, 1);
        assert!(store.list_sessions(None).await.unwrap().is_empty());
    }
}
