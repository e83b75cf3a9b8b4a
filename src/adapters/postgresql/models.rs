//! PostgreSQL row models
//!
//! Conversions between table rows and domain types.

use crate::core::tracker::session::{ImportSession, SessionStatus};
use crate::domain::{BulkloadError, DocumentId, Result, SessionId, StoredDocument};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeSet;
use tokio_postgres::Row;

/// Column list shared by the session queries
pub const SESSION_COLUMNS: &str = "session_id, import_type, entity_kind, file_name, \
     records_imported, imported_ids, import_date, status";

/// Row of the `import_sessions` table
#[derive(Debug, Clone)]
pub struct PostgreSQLSession {
    pub session_id: String,
    pub import_type: String,
    pub entity_kind: String,
    pub file_name: Option<String>,
    pub records_imported: i64,
    pub imported_ids: Value,
    pub import_date: DateTime<Utc>,
    pub status: String,
}

impl PostgreSQLSession {
    pub fn from_domain(session: &ImportSession) -> Result<Self> {
        Ok(Self {
            session_id: session.session_id.to_string(),
            import_type: session.import_type.as_str().to_string(),
            entity_kind: session.entity_kind.as_str().to_string(),
            file_name: session.file_name.clone(),
            records_imported: i64::try_from(session.records_imported).map_err(|e| {
                BulkloadError::Serialization(format!("records_imported out of range: {e}"))
            })?,
            imported_ids: serde_json::to_value(&session.imported_ids)
                .map_err(|e| BulkloadError::Serialization(e.to_string()))?,
            import_date: session.import_date,
            status: session.status.as_str().to_string(),
        })
    }

    /// Read a row selected with [`SESSION_COLUMNS`]
    pub fn from_row(row: &Row) -> Self {
        Self {
            session_id: row.get("session_id"),
            import_type: row.get("import_type"),
            entity_kind: row.get("entity_kind"),
            file_name: row.get("file_name"),
            records_imported: row.get("records_imported"),
            imported_ids: row.get("imported_ids"),
            import_date: row.get("import_date"),
            status: row.get("status"),
        }
    }

    pub fn into_domain(self) -> Result<ImportSession> {
        let imported_ids: BTreeSet<DocumentId> = serde_json::from_value(self.imported_ids)
            .map_err(|e| {
                BulkloadError::Serialization(format!(
                    "Invalid imported_ids for session {}: {e}",
                    self.session_id
                ))
            })?;

        Ok(ImportSession {
            session_id: SessionId::new(self.session_id).map_err(BulkloadError::State)?,
            import_type: self.import_type.parse()?,
            entity_kind: self.entity_kind.parse()?,
            file_name: self.file_name,
            // Derived from the id set so the count can't drift from it
            records_imported: imported_ids.len(),
            imported_ids,
            import_date: self.import_date,
            status: self.status.parse::<SessionStatus>()?,
        })
    }
}

/// JSON array payload for the set-based bulk insert
pub fn documents_payload(documents: &[StoredDocument]) -> Result<Value> {
    serde_json::to_value(documents)
        .map_err(|e| BulkloadError::Serialization(format!("Failed to serialize documents: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityKind, ImportType};
    use serde_json::json;

    #[test]
    fn test_session_round_trip() {
        let mut session = ImportSession::new(
            EntityKind::ActivityLogs,
            ImportType::Manual,
            Some("logs.csv".to_string()),
        );
        session.record(DocumentId::new("doc-b").unwrap());
        session.record(DocumentId::new("doc-a").unwrap());
        session.status = SessionStatus::Partial;

        let row = PostgreSQLSession::from_domain(&session).unwrap();
        assert_eq!(row.entity_kind, "activity_logs");
        assert_eq!(row.imported_ids, json!(["doc-a", "doc-b"]));
        assert_eq!(row.records_imported, 2);

        assert_eq!(row.into_domain().unwrap(), session);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let session = ImportSession::new(EntityKind::Users, ImportType::Bulk, None);
        let mut row = PostgreSQLSession::from_domain(&session).unwrap();
        row.status = "running".to_string();
        assert!(row.into_domain().is_err());
    }

    #[test]
    fn test_documents_payload_shape() {
        let doc = StoredDocument {
            id: DocumentId::new("doc-1").unwrap(),
            entity_kind: EntityKind::Configurations,
            natural_key: None,
            body: serde_json::Map::new(),
        };
        let payload = documents_payload(&[doc]).unwrap();
        assert_eq!(
            payload,
            json!([{"id": "doc-1", "entityKind": "configurations", "body": {}}])
        );
    }
}
