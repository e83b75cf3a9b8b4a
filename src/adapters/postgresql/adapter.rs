//! PostgreSQL adapter implementing the storage traits
//!
//! All kinds share one `documents` table; uniqueness of natural keys per kind is
//! enforced by a partial unique index.

use crate::adapters::database::traits::{
    BulkInsertFailure, BulkInsertResult, DocumentStore, SessionStore,
};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{documents_payload, PostgreSQLSession, SESSION_COLUMNS};
use crate::core::tracker::session::ImportSession;
use crate::domain::{BulkloadError, DocumentId, EntityKind, Result, StoredDocument};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

const BULK_INSERT_SQL: &str = r#"
    INSERT INTO documents (id, entity_kind, natural_key, body)
    SELECT d->>'id', d->>'entityKind', d->>'naturalKey', d->'body'
    FROM jsonb_array_elements($1::jsonb) AS d
    ON CONFLICT DO NOTHING
    RETURNING id
"#;

const INSERT_ONE_SQL: &str = r#"
    INSERT INTO documents (id, entity_kind, natural_key, body)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (id) DO NOTHING
"#;

const UPSERT_SESSION_SQL: &str = r#"
    INSERT INTO import_sessions (
        session_id, import_type, entity_kind, file_name,
        records_imported, imported_ids, import_date, status
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    ON CONFLICT (session_id) DO UPDATE SET
        file_name = EXCLUDED.file_name,
        records_imported = EXCLUDED.records_imported,
        imported_ids = EXCLUDED.imported_ids,
        status = EXCLUDED.status
"#;

/// PostgreSQL implementation of the storage traits
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: Arc<PostgreSQLClient>) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

#[async_trait]
impl DocumentStore for PostgreSQLAdapter {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_collection_exists(&self, _kind: EntityKind) -> Result<()> {
        // One table holds every kind
        self.client.ensure_schema().await
    }

    async fn insert_many(
        &self,
        kind: EntityKind,
        documents: Vec<StoredDocument>,
        timeout: Duration,
    ) -> Result<BulkInsertResult> {
        if documents.is_empty() {
            return Ok(BulkInsertResult::default());
        }

        let payload = documents_payload(&documents)?;
        let mut client = self.client.get_connection().await?;
        let tx = client
            .transaction()
            .await
            .map_err(|e| BulkloadError::Database(format!("Failed to begin transaction: {e}")))?;

        tx.batch_execute(&format!(
            "SET LOCAL statement_timeout = {}",
            timeout.as_millis()
        ))
        .await
        .map_err(|e| BulkloadError::Database(format!("Failed to set statement timeout: {e}")))?;

        let rows = tx
            .query(BULK_INSERT_SQL, &[&payload])
            .await
            .map_err(|e| BulkloadError::Database(format!("Bulk insert failed: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| BulkloadError::Database(format!("Failed to commit bulk insert: {e}")))?;

        let inserted: HashSet<String> = rows.iter().map(|row| row.get::<_, String>(0)).collect();

        let mut result = BulkInsertResult::default();
        for doc in documents {
            if inserted.contains(doc.id.as_str()) {
                result.inserted_ids.push(doc.id);
            } else {
                result.failures.push(BulkInsertFailure {
                    document_id: doc.id,
                    error: "duplicate key: conflicts with an existing document".to_string(),
                });
            }
        }

        tracing::debug!(
            entity_kind = %kind,
            inserted = result.success_count(),
            rejected = result.failure_count(),
            "PostgreSQL bulk insert finished"
        );

        Ok(result)
    }

    async fn insert_one(&self, kind: EntityKind, document: StoredDocument) -> Result<DocumentId> {
        let body = Value::Object(document.body);
        let inserted = self
            .client
            .execute(
                INSERT_ONE_SQL,
                &[
                    &document.id.as_str(),
                    &kind.as_str(),
                    &document.natural_key,
                    &body,
                ],
            )
            .await?;
        if inserted == 0 {
            return Err(BulkloadError::DocumentExists(document.id));
        }
        Ok(document.id)
    }

    async fn delete_by_ids(&self, kind: EntityKind, ids: &[DocumentId]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let ids: Vec<&str> = ids.iter().map(DocumentId::as_str).collect();
        self.client
            .execute(
                "DELETE FROM documents WHERE entity_kind = $1 AND id = ANY($2)",
                &[&kind.as_str(), &ids],
            )
            .await
    }

    async fn delete_all(&self, kind: EntityKind) -> Result<u64> {
        self.client
            .execute("DELETE FROM documents WHERE entity_kind = $1", &[&kind.as_str()])
            .await
    }

    async fn count(&self, kind: EntityKind) -> Result<u64> {
        let rows = self
            .client
            .query(
                "SELECT COUNT(*) FROM documents WHERE entity_kind = $1",
                &[&kind.as_str()],
            )
            .await?;
        let count: i64 = rows.first().map(|row| row.get(0)).unwrap_or(0);
        Ok(count.max(0) as u64)
    }

    fn database_name(&self) -> &str {
        self.client.database_name()
    }
}

#[async_trait]
impl SessionStore for PostgreSQLAdapter {
    async fn ensure_session_collection_exists(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn save_session(&self, session: &ImportSession) -> Result<()> {
        let row = PostgreSQLSession::from_domain(session)?;
        self.client
            .execute(
                UPSERT_SESSION_SQL,
                &[
                    &row.session_id,
                    &row.import_type,
                    &row.entity_kind,
                    &row.file_name,
                    &row.records_imported,
                    &row.imported_ids,
                    &row.import_date,
                    &row.status,
                ],
            )
            .await?;
        Ok(())
    }

    async fn list_sessions(&self, kind: Option<EntityKind>) -> Result<Vec<ImportSession>> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM import_sessions \
             WHERE ($1::text IS NULL OR entity_kind = $1) \
             ORDER BY import_date DESC"
        );
        let kind = kind.map(|k| k.as_str());
        let rows = self.client.query(&query, &[&kind]).await?;

        rows.iter()
            .map(|row| PostgreSQLSession::from_row(row).into_domain())
            .collect()
    }

    async fn delete_sessions(&self, sessions: &[ImportSession]) -> Result<u64> {
        if sessions.is_empty() {
            return Ok(0);
        }
        let ids: Vec<&str> = sessions.iter().map(|s| s.session_id.as_str()).collect();
        self.client
            .execute(
                "DELETE FROM import_sessions WHERE session_id = ANY($1)",
                &[&ids],
            )
            .await
    }
}
