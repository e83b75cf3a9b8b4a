//! Storage abstraction traits
//!
//! Backends implement [`DocumentStore`] for imported records and [`SessionStore`]
//! for import session provenance.

use crate::core::tracker::session::ImportSession;
use crate::domain::{DocumentId, EntityKind, Result, StoredDocument};
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of a bulk insert call that completed
///
/// Every submitted document appears either in `inserted_ids` or in `failures`.
#[derive(Debug, Clone, Default)]
pub struct BulkInsertResult {
    /// Ids of documents that were stored
    pub inserted_ids: Vec<DocumentId>,

    /// Documents the store rejected individually
    pub failures: Vec<BulkInsertFailure>,
}

impl BulkInsertResult {
    pub fn success_count(&self) -> usize {
        self.inserted_ids.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Details of a document rejected within a bulk insert
#[derive(Debug, Clone)]
pub struct BulkInsertFailure {
    /// Document that was rejected
    pub document_id: DocumentId,

    /// Error message
    pub error: String,
}

/// Document storage for imported records
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Test the database connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Ensure the collection for an entity kind exists, creating it if necessary
    async fn ensure_collection_exists(&self, kind: EntityKind) -> Result<()>;

    /// Unordered bulk insert with per-document error continuation
    ///
    /// The call must finish within `timeout`. An `Err` means the call as a whole failed
    /// and the caller can't tell which documents were stored.
    async fn insert_many(
        &self,
        kind: EntityKind,
        documents: Vec<StoredDocument>,
        timeout: Duration,
    ) -> Result<BulkInsertResult>;

    /// Insert a single document
    ///
    /// # Errors
    ///
    /// Returns an error if the document was not stored (constraint violation, I/O).
    async fn insert_one(&self, kind: EntityKind, document: StoredDocument) -> Result<DocumentId>;

    /// Delete exactly the given ids from a kind's collection
    ///
    /// An empty id slice deletes nothing. Returns the number of documents removed.
    async fn delete_by_ids(&self, kind: EntityKind, ids: &[DocumentId]) -> Result<u64>;

    /// Delete every document in a kind's collection
    async fn delete_all(&self, kind: EntityKind) -> Result<u64>;

    /// Number of documents in a kind's collection
    async fn count(&self, kind: EntityKind) -> Result<u64>;

    /// Get the database name
    fn database_name(&self) -> &str;
}

/// Persistence for import sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Ensure the session collection exists
    async fn ensure_session_collection_exists(&self) -> Result<()>;

    /// Insert or replace a session document keyed by its session id
    async fn save_session(&self, session: &ImportSession) -> Result<()>;

    /// List sessions, optionally restricted to one entity kind, newest first
    async fn list_sessions(&self, kind: Option<EntityKind>) -> Result<Vec<ImportSession>>;

    /// Delete the given session documents, returning how many were removed
    async fn delete_sessions(&self, sessions: &[ImportSession]) -> Result<u64>;
}
