//! Cosmos DB adapter implementing the storage traits
//!
//! Cosmos has no secondary unique keys here, so natural-key uniqueness is not
//! enforced; id conflicts surface as per-document rejections.

use crate::adapters::cosmosdb::client::{is_conflict, is_not_found, CosmosDbClient};
use crate::adapters::cosmosdb::models::{CosmosIdOnly, CosmosSession};
use crate::adapters::database::traits::{
    BulkInsertFailure, BulkInsertResult, DocumentStore, SessionStore,
};
use crate::core::tracker::session::ImportSession;
use crate::domain::{BulkloadError, CosmosDbError, DocumentId, EntityKind, Result, StoredDocument};
use async_trait::async_trait;
use azure_data_cosmos::PartitionKey;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Cosmos DB implementation of the storage traits
pub struct CosmosDbAdapter {
    client: Arc<CosmosDbClient>,
}

impl CosmosDbAdapter {
    /// Create a new Cosmos DB adapter
    pub fn new(client: Arc<CosmosDbClient>) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<CosmosDbClient> {
        &self.client
    }

    fn partition_key(kind: EntityKind) -> PartitionKey {
        PartitionKey::from(kind.as_str().to_string())
    }

    async fn delete_documents(&self, kind: EntityKind, ids: &[String]) -> Result<u64> {
        let container = self.client.data_container(kind);
        let mut deleted = 0u64;

        for id in ids {
            match container
                .delete_item(Self::partition_key(kind), id, None)
                .await
            {
                Ok(_) => deleted += 1,
                Err(e) if is_not_found(&e.to_string()) => {
                    tracing::debug!(document_id = %id, "Document already gone");
                }
                Err(e) => {
                    return Err(BulkloadError::CosmosDb(CosmosDbError::DeleteFailed(
                        format!("Failed to delete document {id}: {e}"),
                    )));
                }
            }
        }

        Ok(deleted)
    }
}

#[async_trait]
impl DocumentStore for CosmosDbAdapter {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_collection_exists(&self, kind: EntityKind) -> Result<()> {
        self.client.ensure_data_container_exists(kind).await
    }

    async fn insert_many(
        &self,
        kind: EntityKind,
        documents: Vec<StoredDocument>,
        timeout: Duration,
    ) -> Result<BulkInsertResult> {
        let container = self.client.data_container(kind);
        let container = &container;
        let concurrency = self.client.max_concurrency().max(1);

        let writes = stream::iter(documents)
            .map(|doc| async move {
                let outcome = container
                    .create_item(Self::partition_key(kind), &doc, None)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string());
                (doc.id, outcome)
            })
            .buffer_unordered(concurrency)
            .collect::<Vec<_>>();

        let outcomes = tokio::time::timeout(timeout, writes).await.map_err(|_| {
            BulkloadError::CosmosDb(CosmosDbError::Timeout(format!(
                "Bulk insert into {} exceeded {}s",
                self.client.data_container_name(kind),
                timeout.as_secs()
            )))
        })?;

        let mut result = BulkInsertResult::default();
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => result.inserted_ids.push(id),
                Err(error) => {
                    if !is_conflict(&error) {
                        tracing::warn!(document_id = %id, error = %error, "Cosmos write failed");
                    }
                    result.failures.push(BulkInsertFailure {
                        document_id: id,
                        error,
                    });
                }
            }
        }

        tracing::debug!(
            entity_kind = %kind,
            inserted = result.success_count(),
            rejected = result.failure_count(),
            "Cosmos bulk insert finished"
        );

        Ok(result)
    }

    async fn insert_one(&self, kind: EntityKind, document: StoredDocument) -> Result<DocumentId> {
        self.client
            .data_container(kind)
            .create_item(Self::partition_key(kind), &document, None)
            .await
            .map_err(|e| {
                // No unique key policy on data containers, so a conflict is always the id
                if is_conflict(&e.to_string()) {
                    BulkloadError::DocumentExists(document.id.clone())
                } else {
                    BulkloadError::CosmosDb(CosmosDbError::InsertFailed(format!(
                        "Failed to insert document {}: {e}",
                        document.id
                    )))
                }
            })?;
        Ok(document.id)
    }

    async fn delete_by_ids(&self, kind: EntityKind, ids: &[DocumentId]) -> Result<u64> {
        let ids: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();
        self.delete_documents(kind, &ids).await
    }

    async fn delete_all(&self, kind: EntityKind) -> Result<u64> {
        let container = self.client.data_container(kind);
        let ids: Vec<String> = self
            .client
            .query_partition::<CosmosIdOnly>(&container, "SELECT c.id FROM c", kind)
            .await?
            .into_iter()
            .map(|row| row.id)
            .collect();
        self.delete_documents(kind, &ids).await
    }

    async fn count(&self, kind: EntityKind) -> Result<u64> {
        let container = self.client.data_container(kind);
        let counts = self
            .client
            .query_partition::<Value>(&container, "SELECT VALUE COUNT(1) FROM c", kind)
            .await?;
        Ok(counts.iter().filter_map(Value::as_u64).sum())
    }

    fn database_name(&self) -> &str {
        self.client.database_name()
    }
}

#[async_trait]
impl SessionStore for CosmosDbAdapter {
    async fn ensure_session_collection_exists(&self) -> Result<()> {
        self.client.ensure_session_container_exists().await
    }

    async fn save_session(&self, session: &ImportSession) -> Result<()> {
        let kind = session.entity_kind;
        let document = CosmosSession::from(session.clone());

        self.client
            .session_container()
            .upsert_item(Self::partition_key(kind), &document, None)
            .await
            .map_err(|e| {
                BulkloadError::CosmosDb(CosmosDbError::WriteFailed(format!(
                    "Failed to save session {}: {e}",
                    session.session_id
                )))
            })?;
        Ok(())
    }

    async fn list_sessions(&self, kind: Option<EntityKind>) -> Result<Vec<ImportSession>> {
        let container = self.client.session_container();
        let kinds: Vec<EntityKind> = match kind {
            Some(kind) => vec![kind],
            None => EntityKind::ALL.to_vec(),
        };

        let mut sessions = Vec::new();
        for kind in kinds {
            let documents = self
                .client
                .query_partition::<CosmosSession>(&container, "SELECT * FROM c", kind)
                .await?;
            sessions.extend(documents.into_iter().map(ImportSession::from));
        }

        sessions.sort_by(|a, b| b.import_date.cmp(&a.import_date));
        Ok(sessions)
    }

    async fn delete_sessions(&self, sessions: &[ImportSession]) -> Result<u64> {
        let container = self.client.session_container();
        let mut deleted = 0u64;

        for session in sessions {
            match container
                .delete_item(
                    Self::partition_key(session.entity_kind),
                    session.session_id.as_str(),
                    None,
                )
                .await
            {
                Ok(_) => deleted += 1,
                Err(e) if is_not_found(&e.to_string()) => {}
                Err(e) => {
                    return Err(BulkloadError::CosmosDb(CosmosDbError::DeleteFailed(
                        format!("Failed to delete session {}: {e}", session.session_id),
                    )));
                }
            }
        }

        Ok(deleted)
    }
}
