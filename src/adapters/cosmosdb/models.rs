//! Cosmos DB document models
//!
//! Documents are stored with `entityKind` as their partition key value. Session
//! documents reuse the session id as the Cosmos `id`.

use crate::core::tracker::session::ImportSession;
use serde::{Deserialize, Serialize};

/// Partition key path shared by data and session containers
pub const PARTITION_KEY_PATH: &str = "/entityKind";

/// Import session as stored in the session container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmosSession {
    /// Cosmos document id, equal to the session id
    pub id: String,

    #[serde(flatten)]
    pub session: ImportSession,
}

impl From<ImportSession> for CosmosSession {
    fn from(session: ImportSession) -> Self {
        Self {
            id: session.session_id.to_string(),
            session,
        }
    }
}

impl From<CosmosSession> for ImportSession {
    fn from(doc: CosmosSession) -> Self {
        doc.session
    }
}

/// Row shape of `SELECT c.id FROM c`
#[derive(Debug, Clone, Deserialize)]
pub struct CosmosIdOnly {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentId, EntityKind, ImportType};
    use serde_json::json;

    #[test]
    fn test_session_document_shape() {
        let mut session = ImportSession::new(EntityKind::Users, ImportType::Seed, None);
        session.record(DocumentId::new("doc-1").unwrap());
        let session_id = session.session_id.to_string();

        let value = serde_json::to_value(CosmosSession::from(session)).unwrap();
        assert_eq!(value["id"], json!(session_id));
        assert_eq!(value["sessionId"], json!(session_id));
        assert_eq!(value["entityKind"], json!("users"));
        assert_eq!(value["importedIds"], json!(["doc-1"]));
    }

    #[test]
    fn test_session_document_ignores_system_fields() {
        let session = ImportSession::new(EntityKind::Organizations, ImportType::Bulk, None);
        let mut value = serde_json::to_value(CosmosSession::from(session.clone())).unwrap();
        value["_rid"] = json!("abc==");
        value["_ts"] = json!(1735689600);

        let doc: CosmosSession = serde_json::from_value(value).unwrap();
        assert_eq!(ImportSession::from(doc), session);
    }
}
