//! Import session model
//!
//! An import session is the provenance record of one run: which documents it
//! created, for which entity kind, and how the run ended.

use crate::domain::{BulkloadError, DocumentId, EntityKind, ImportType, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Terminal status of an import run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No insert failures
    Completed,
    /// Some records stored, some failed
    Partial,
    /// Nothing stored and at least one failure, or the run aborted
    Failed,
}

impl SessionStatus {
    /// Classify a run from its insert counts
    ///
    /// Skipped (invalid) records don't influence the status.
    pub fn classify(successful: usize, failed: usize) -> Self {
        match (successful, failed) {
            (_, 0) => SessionStatus::Completed,
            (0, _) => SessionStatus::Failed,
            _ => SessionStatus::Partial,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Completed => "completed",
            SessionStatus::Partial => "partial",
            SessionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = BulkloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(SessionStatus::Completed),
            "partial" => Ok(SessionStatus::Partial),
            "failed" => Ok(SessionStatus::Failed),
            other => Err(BulkloadError::State(format!(
                "Unknown session status '{other}'"
            ))),
        }
    }
}

/// Persisted provenance record of one import run
///
/// `records_imported` always equals the number of distinct `imported_ids`.
///
/// # Examples
///
/// ```
/// use bulkload::core::tracker::session::{ImportSession, SessionStatus};
/// use bulkload::domain::{DocumentId, EntityKind, ImportType};
///
/// let mut session = ImportSession::new(EntityKind::Users, ImportType::Seed, None);
/// let id = DocumentId::generate();
/// session.record(id.clone());
/// session.record(id);
/// assert_eq!(session.records_imported, 1);
/// assert_eq!(session.status, SessionStatus::Completed);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSession {
    pub session_id: SessionId,
    pub import_type: ImportType,
    pub entity_kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub records_imported: usize,
    pub imported_ids: BTreeSet<DocumentId>,
    pub import_date: DateTime<Utc>,
    pub status: SessionStatus,
}

impl ImportSession {
    /// Start a session for a run beginning now
    pub fn new(kind: EntityKind, import_type: ImportType, file_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: SessionId::generate_at(kind, import_type, now),
            import_type,
            entity_kind: kind,
            file_name,
            records_imported: 0,
            imported_ids: BTreeSet::new(),
            import_date: now,
            status: SessionStatus::Completed,
        }
    }

    /// Record a stored document; returns false if it was already recorded
    pub fn record(&mut self, id: DocumentId) -> bool {
        let inserted = self.imported_ids.insert(id);
        self.records_imported = self.imported_ids.len();
        inserted
    }

    /// Whether this session matches an optional kind and import type filter
    pub fn matches(&self, kind: Option<EntityKind>, import_type: Option<ImportType>) -> bool {
        kind.map_or(true, |k| k == self.entity_kind)
            && import_type.map_or(true, |t| t == self.import_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(SessionStatus::classify(10, 0), SessionStatus::Completed);
        assert_eq!(SessionStatus::classify(0, 0), SessionStatus::Completed);
        assert_eq!(SessionStatus::classify(9, 1), SessionStatus::Partial);
        assert_eq!(SessionStatus::classify(0, 3), SessionStatus::Failed);
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            SessionStatus::Completed,
            SessionStatus::Partial,
            SessionStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<SessionStatus>().unwrap(), status);
        }
        assert!("done".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_record_is_idempotent() {
        let mut session = ImportSession::new(EntityKind::Organizations, ImportType::Bulk, None);
        let id = DocumentId::new("doc-1").unwrap();

        assert!(session.record(id.clone()));
        assert!(!session.record(id));
        assert_eq!(session.records_imported, 1);
        assert_eq!(session.imported_ids.len(), 1);
    }

    #[test]
    fn test_session_id_carries_kind_and_type() {
        let session = ImportSession::new(EntityKind::Configurations, ImportType::Manual, None);
        assert!(session
            .session_id
            .as_str()
            .starts_with("configurations_manual_"));
    }

    #[test]
    fn test_matches_filters() {
        let session = ImportSession::new(EntityKind::Users, ImportType::Seed, None);
        assert!(session.matches(None, None));
        assert!(session.matches(Some(EntityKind::Users), Some(ImportType::Seed)));
        assert!(!session.matches(Some(EntityKind::Organizations), None));
        assert!(!session.matches(None, Some(ImportType::Bulk)));
    }

    #[test]
    fn test_serialized_shape() {
        let mut session = ImportSession::new(
            EntityKind::ActivityLogs,
            ImportType::Bulk,
            Some("logs.csv".to_string()),
        );
        session.record(DocumentId::new("b").unwrap());
        session.record(DocumentId::new("a").unwrap());

        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["entityKind"], "activity_logs");
        assert_eq!(value["importType"], "bulk");
        assert_eq!(value["recordsImported"], 2);
        assert_eq!(value["importedIds"], serde_json::json!(["a", "b"]));
        assert_eq!(value["status"], "completed");

        let back: ImportSession = serde_json::from_value(value).unwrap();
        assert_eq!(back, session);
    }
}
