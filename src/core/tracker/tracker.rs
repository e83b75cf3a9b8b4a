//! Per-run import tracker
//!
//! Accumulates the ids of documents stored during one run and persists the
//! session document when the run ends.

use super::session::{ImportSession, SessionStatus};
use crate::adapters::database::traits::SessionStore;
use crate::domain::{BulkloadError, DocumentId, EntityKind, ImportType, Result, SessionId};
use std::sync::Arc;

/// Tracks the documents created by a single import run
pub struct ImportTracker {
    session: ImportSession,
    store: Arc<dyn SessionStore>,
}

impl ImportTracker {
    /// Begin tracking a new run; the session id is fixed here
    pub fn new(
        store: Arc<dyn SessionStore>,
        kind: EntityKind,
        import_type: ImportType,
        file_name: Option<String>,
    ) -> Self {
        Self {
            session: ImportSession::new(kind, import_type, file_name),
            store,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session.session_id
    }

    pub fn session(&self) -> &ImportSession {
        &self.session
    }

    pub fn records_imported(&self) -> usize {
        self.session.records_imported
    }

    /// Record one stored document; repeated ids are ignored
    pub fn track_record(&mut self, id: DocumentId) {
        if !self.session.record(id) {
            tracing::trace!(session_id = %self.session.session_id, "Document already tracked");
        }
    }

    /// Record several stored documents
    pub fn track_records(&mut self, ids: impl IntoIterator<Item = DocumentId>) {
        for id in ids {
            self.track_record(id);
        }
    }

    /// Upsert the session as `partial` without ending the run
    pub async fn checkpoint(&mut self) -> Result<()> {
        self.session.status = SessionStatus::Partial;
        tracing::debug!(
            session_id = %self.session.session_id,
            records_imported = self.session.records_imported,
            "Checkpointing import session"
        );
        self.persist().await
    }

    /// Persist the session with its final status and return the saved record
    ///
    /// # Errors
    ///
    /// Returns a [`BulkloadError::State`] naming the session id if the store rejects it.
    pub async fn save_session(&mut self, status: SessionStatus) -> Result<ImportSession> {
        self.session.status = status;
        self.persist().await?;

        tracing::info!(
            session_id = %self.session.session_id,
            status = %status,
            records_imported = self.session.records_imported,
            "Import session saved"
        );
        Ok(self.session.clone())
    }

    async fn persist(&self) -> Result<()> {
        self.store.save_session(&self.session).await.map_err(|e| {
            BulkloadError::State(format!(
                "Failed to persist import session {}: {}",
                self.session.session_id, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::config::MemoryBulkMode;

    fn tracker(store: Arc<MemoryStore>) -> ImportTracker {
        ImportTracker::new(
            store,
            EntityKind::Organizations,
            ImportType::Bulk,
            Some("orgs.json".to_string()),
        )
    }

    #[tokio::test]
    async fn test_tracking_same_id_twice() {
        let store = Arc::new(MemoryStore::new(MemoryBulkMode::Continue));
        let mut tracker = tracker(store);
        let id = DocumentId::new("doc-1").unwrap();

        tracker.track_record(id.clone());
        tracker.track_record(id.clone());
        tracker.track_records(vec![id, DocumentId::new("doc-2").unwrap()]);

        assert_eq!(tracker.records_imported(), 2);
        assert_eq!(tracker.session().imported_ids.len(), 2);
    }

    #[tokio::test]
    async fn test_save_session_persists_status() {
        let store = Arc::new(MemoryStore::new(MemoryBulkMode::Continue));
        let mut tracker = tracker(store.clone());
        tracker.track_record(DocumentId::new("doc-1").unwrap());

        let saved = tracker.save_session(SessionStatus::Partial).await.unwrap();
        assert_eq!(saved.status, SessionStatus::Partial);

        let sessions = store.list_sessions(None).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_id, *tracker.session_id());
        assert_eq!(sessions[0].records_imported, 1);
        assert_eq!(sessions[0].file_name.as_deref(), Some("orgs.json"));
    }

    #[tokio::test]
    async fn test_checkpoint_then_final_save_keeps_one_document() {
        let store = Arc::new(MemoryStore::new(MemoryBulkMode::Continue));
        let mut tracker = tracker(store.clone());

        tracker.track_record(DocumentId::new("doc-1").unwrap());
        tracker.checkpoint().await.unwrap();
        tracker.track_record(DocumentId::new("doc-2").unwrap());
        tracker.save_session(SessionStatus::Completed).await.unwrap();

        let sessions = store.list_sessions(None).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].status, SessionStatus::Completed);
        assert_eq!(sessions[0].records_imported, 2);
    }
}
