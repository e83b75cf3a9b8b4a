//! End-to-end import runs against the in-memory store
//!
//! These tests verify that:
//! - Invalid records are skipped without aborting the run
//! - Bulk failures fall back to single inserts and count per-record failures
//! - Sessions record exactly the stored ids
//! - Scoped clears never touch documents the importer didn't create

use async_trait::async_trait;
use bulkload::adapters::database::{BulkInsertResult, DocumentStore, SessionStore};
use bulkload::adapters::memory::MemoryStore;
use bulkload::config::MemoryBulkMode;
use bulkload::core::import::{ImportCoordinator, ImportRequest};
use bulkload::core::tracker::{SessionManager, SessionStatus};
use bulkload::domain::{
    BulkloadError, DocumentId, EntityKind, ImportType, Result, StoredDocument,
};
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Map, Value};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

fn source_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn organizations_json(count: usize, email_prefix: &str) -> String {
    let records: Vec<Value> = (0..count)
        .map(|i| {
            let name: String = CompanyName().fake();
            json!({
                "name": name,
                "contactEmail": format!("{email_prefix}{i}@example.com"),
                "status": "active",
                "plan": "pro",
                "usersCount": (i * 3).to_string(),
            })
        })
        .collect();
    Value::Array(records).to_string()
}

fn memory_store(mode: MemoryBulkMode) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new(mode))
}

#[tokio::test]
async fn test_invalid_record_is_skipped() {
    let store = memory_store(MemoryBulkMode::Continue);
    let file = source_file(
        ".json",
        r#"[
            {"name": "Acme", "contactEmail": "ops@acme.test", "status": "active"},
            {"name": "No Contact Ltd"}
        ]"#,
    );

    let report = ImportCoordinator::new(store.clone(), store.clone())
        .run(ImportRequest::new(EntityKind::Organizations, file.path()))
        .await
        .unwrap();

    assert_eq!(report.stats.total_records, 2);
    assert_eq!(report.stats.successful_inserts, 1);
    assert_eq!(report.stats.skipped_records, 1);
    assert_eq!(report.stats.failed_inserts, 0);
    assert_eq!(report.stats.errors.len(), 1);
    assert_eq!(report.stats.errors[0].record_index, 1);
    assert_eq!(report.status(), SessionStatus::Completed);

    assert_eq!(store.count(EntityKind::Organizations).await.unwrap(), 1);
    let sessions = store.list_sessions(None).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].records_imported, 1);

    let stored = store.documents(EntityKind::Organizations).await;
    assert_eq!(stored[0].body["name"], json!("Acme"));
    assert!(sessions[0].imported_ids.contains(&stored[0].id));

    let cleared = SessionManager::new(store.clone(), store.clone())
        .clear_imported_data(EntityKind::Organizations, None)
        .await
        .unwrap();
    assert_eq!(cleared.documents_deleted, 1);
    assert_eq!(store.count(EntityKind::Organizations).await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_in_batch_falls_back_to_single_inserts() {
    let store = memory_store(MemoryBulkMode::AbortOnConflict);

    let mut lines = vec!["email,fullName,role".to_string()];
    for i in 0..49 {
        let name: String = Name().fake();
        lines.push(format!("user{i}@example.com,\"{name}\",member"));
    }
    // Same address as the first user, different case
    lines.push("USER0@example.com,Dup Licate,admin".to_string());
    let file = source_file(".csv", &lines.join("\n"));

    // One window of 50; the in-batch duplicate aborts the bulk call
    let report = ImportCoordinator::new(store.clone(), store.clone())
        .run(ImportRequest::new(EntityKind::Users, file.path()))
        .await
        .unwrap();

    assert_eq!(report.stats.total_records, 50);
    assert_eq!(report.stats.successful_inserts, 49);
    assert_eq!(report.stats.failed_inserts, 1);
    assert_eq!(report.stats.skipped_records, 0);
    assert_eq!(report.stats.errors[0].record_index, 49);
    assert_eq!(report.status(), SessionStatus::Partial);

    assert_eq!(report.session.records_imported, 49);
    assert_eq!(store.count(EntityKind::Users).await.unwrap(), 49);
}

#[tokio::test]
async fn test_clear_only_removes_imported_documents() {
    let store = memory_store(MemoryBulkMode::Continue);

    // Created outside any import session
    let mut body = Map::new();
    body.insert("name".to_string(), json!("Hand Made Co"));
    let manual = StoredDocument {
        id: DocumentId::new("pre-existing").unwrap(),
        entity_kind: EntityKind::Organizations,
        natural_key: Some("hand@made.test".to_string()),
        body,
    };
    store
        .insert_one(EntityKind::Organizations, manual)
        .await
        .unwrap();

    let file = source_file(".json", &organizations_json(3, "org"));
    let report = ImportCoordinator::new(store.clone(), store.clone())
        .run(ImportRequest::new(EntityKind::Organizations, file.path()))
        .await
        .unwrap();
    assert_eq!(report.stats.successful_inserts, 3);
    assert_eq!(store.count(EntityKind::Organizations).await.unwrap(), 4);

    let manager = SessionManager::new(store.clone(), store.clone());
    let cleared = manager
        .clear_imported_data(EntityKind::Organizations, None)
        .await
        .unwrap();

    assert_eq!(cleared.documents_deleted, 3);
    assert_eq!(cleared.sessions_deleted, 1);

    let remaining = store.documents(EntityKind::Organizations).await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id.as_str(), "pre-existing");
    assert!(store.list_sessions(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_filtered_by_import_type() {
    let store = memory_store(MemoryBulkMode::Continue);
    let coordinator = ImportCoordinator::new(store.clone(), store.clone());

    let seed_file = source_file(".json", &organizations_json(2, "seed"));
    let mut seed = ImportRequest::new(EntityKind::Organizations, seed_file.path());
    seed.import_type = ImportType::Seed;
    coordinator.run(seed).await.unwrap();

    let bulk_file = source_file(".json", &organizations_json(5, "bulk"));
    let bulk_report = coordinator
        .run(ImportRequest::new(EntityKind::Organizations, bulk_file.path()))
        .await
        .unwrap();

    let manager = SessionManager::new(store.clone(), store.clone());
    let cleared = manager
        .clear_imported_data(EntityKind::Organizations, Some(ImportType::Seed))
        .await
        .unwrap();
    assert_eq!(cleared.documents_deleted, 2);
    assert_eq!(cleared.sessions_deleted, 1);

    let remaining = manager
        .imported_ids(EntityKind::Organizations, None)
        .await
        .unwrap();
    assert_eq!(remaining, bulk_report.session.imported_ids);
    assert_eq!(store.count(EntityKind::Organizations).await.unwrap(), 5);
}

#[tokio::test]
async fn test_wrapped_json_and_clear_existing() {
    let store = memory_store(MemoryBulkMode::Continue);
    let coordinator = ImportCoordinator::new(store.clone(), store.clone());

    let first = source_file(".json", &organizations_json(4, "first"));
    coordinator
        .run(ImportRequest::new(EntityKind::Organizations, first.path()))
        .await
        .unwrap();

    let wrapped = format!(
        "{{\"organizations\": {}}}",
        organizations_json(2, "second")
    );
    let second = source_file(".json", &wrapped);
    let mut request = ImportRequest::new(EntityKind::Organizations, second.path());
    request.clear_existing = true;
    let report = coordinator.run(request).await.unwrap();

    assert_eq!(report.stats.successful_inserts, 2);
    assert_eq!(store.count(EntityKind::Organizations).await.unwrap(), 2);
}

/// Document store whose bulk path always fails
struct BulkRejectingStore {
    inner: MemoryStore,
    bulk_calls: AtomicUsize,
}

#[async_trait]
impl DocumentStore for BulkRejectingStore {
    async fn test_connection(&self) -> Result<()> {
        self.inner.test_connection().await
    }

    async fn ensure_collection_exists(&self, kind: EntityKind) -> Result<()> {
        self.inner.ensure_collection_exists(kind).await
    }

    async fn insert_many(
        &self,
        _kind: EntityKind,
        _documents: Vec<StoredDocument>,
        _timeout: Duration,
    ) -> Result<BulkInsertResult> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        Err(BulkloadError::Connection("bulk endpoint unavailable".to_string()))
    }

    async fn insert_one(&self, kind: EntityKind, document: StoredDocument) -> Result<DocumentId> {
        self.inner.insert_one(kind, document).await
    }

    async fn delete_by_ids(&self, kind: EntityKind, ids: &[DocumentId]) -> Result<u64> {
        self.inner.delete_by_ids(kind, ids).await
    }

    async fn delete_all(&self, kind: EntityKind) -> Result<u64> {
        self.inner.delete_all(kind).await
    }

    async fn count(&self, kind: EntityKind) -> Result<u64> {
        self.inner.count(kind).await
    }

    fn database_name(&self) -> &str {
        "bulk-rejecting"
    }
}

#[tokio::test]
async fn test_failed_bulk_calls_fall_back_per_record() {
    let documents = Arc::new(BulkRejectingStore {
        inner: MemoryStore::default(),
        bulk_calls: AtomicUsize::new(0),
    });
    let sessions = memory_store(MemoryBulkMode::Continue);

    let file = source_file(
        ".json",
        r#"{"activityLogs": [
            {"userId": "u1", "pageName": "home", "timestamp": "2025-03-01T08:30:00Z", "durationMs": "1200"},
            {"userId": "u2", "pageName": "billing", "action": "click"},
            {"userId": "u3"}
        ]}"#,
    );
    let mut request = ImportRequest::new(EntityKind::ActivityLogs, file.path());
    request.batch_size = 2;

    let report = ImportCoordinator::new(documents.clone(), sessions.clone())
        .run(request)
        .await
        .unwrap();

    assert_eq!(documents.bulk_calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.stats.successful_inserts, 2);
    assert_eq!(report.stats.skipped_records, 1);
    assert_eq!(report.status(), SessionStatus::Completed);
    assert_eq!(documents.count(EntityKind::ActivityLogs).await.unwrap(), 2);

    let saved = sessions.list_sessions(Some(EntityKind::ActivityLogs)).await.unwrap();
    assert_eq!(saved[0].records_imported, 2);
}
