//! Batch processing for record imports
//!
//! This module validates a window of raw records, bulk inserts the valid ones,
//! and falls back to single-document inserts when the bulk call fails. A failed
//! bulk call may still have stored some documents; the fallback finds those by
//! their id and tracks them.

use super::summary::RecordError;
use crate::adapters::database::traits::DocumentStore;
use crate::core::tracker::ImportTracker;
use crate::domain::{
    BulkloadError, CanonicalRecord, DocumentId, EntityKind, RawRecord, StoredDocument,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Default number of records per window
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Configuration for batch processing
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Records per window (1-10000)
    pub batch_size: usize,
    /// Time budget for one bulk insert call
    pub bulk_timeout: Duration,
}

impl BatchConfig {
    /// Create a new batch configuration
    pub fn new(batch_size: usize, bulk_timeout: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            bulk_timeout,
        }
    }

    /// Number of windows needed for `total` records
    pub fn total_batches(&self, total: usize) -> usize {
        total.div_ceil(self.batch_size)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE, Duration::from_secs(30))
    }
}

/// Result of processing a batch
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Documents stored
    pub successful: usize,
    /// Valid records the store rejected
    pub failed: usize,
    /// Records that failed validation
    pub skipped: usize,
    /// Errors encountered, in record order for each stage
    pub errors: Vec<RecordError>,
    /// The bulk call failed and single inserts were used instead
    pub used_fallback: bool,
}

impl BatchResult {
    /// Create a new empty batch result
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stored document
    pub fn add_success(&mut self) {
        self.successful += 1;
    }

    /// Add a record the store rejected
    pub fn add_failure(&mut self, error: RecordError) {
        self.failed += 1;
        self.errors.push(error);
    }

    /// Add a record that failed validation
    pub fn add_skipped(&mut self, error: RecordError) {
        self.skipped += 1;
        self.errors.push(error);
    }

    /// Records accounted for in this batch
    pub fn processed(&self) -> usize {
        self.successful + self.failed + self.skipped
    }
}

/// A validated record ready for storage, with its source position
struct Prepared<'a> {
    index: usize,
    raw: &'a RawRecord,
    document: StoredDocument,
}

/// Batch processor for one entity kind
pub struct BatchProcessor {
    store: Arc<dyn DocumentStore>,
    kind: EntityKind,
    config: BatchConfig,
}

impl BatchProcessor {
    /// Create a new batch processor
    pub fn new(store: Arc<dyn DocumentStore>, kind: EntityKind, config: BatchConfig) -> Self {
        Self {
            store,
            kind,
            config,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process one window of records
    ///
    /// `offset` is the source index of `records[0]`. Stored ids are handed to
    /// `tracker`. Storage failures are absorbed into the result, so this never fails.
    pub async fn process_batch(
        &self,
        records: &[RawRecord],
        offset: usize,
        tracker: &mut ImportTracker,
    ) -> BatchResult {
        let mut result = BatchResult::new();
        let prepared = self.prepare(records, offset, &mut result);

        if prepared.is_empty() {
            tracing::debug!(
                entity_kind = %self.kind,
                offset,
                "No valid records in batch, skipping storage"
            );
            return result;
        }

        let documents: Vec<StoredDocument> =
            prepared.iter().map(|p| p.document.clone()).collect();

        match self
            .store
            .insert_many(self.kind, documents, self.config.bulk_timeout)
            .await
        {
            Ok(bulk) => {
                let mut pending: HashMap<&DocumentId, &Prepared> =
                    prepared.iter().map(|p| (&p.document.id, p)).collect();

                for id in bulk.inserted_ids {
                    if pending.remove(&id).is_some() {
                        tracker.track_record(id);
                        result.add_success();
                    }
                }
                for failure in bulk.failures {
                    if let Some(p) = pending.remove(&failure.document_id) {
                        result.add_failure(RecordError::new(p.index, failure.error, p.raw.clone()));
                    }
                }

                // Anything the store neither stored nor rejected is unconfirmed
                let mut unconfirmed: Vec<&Prepared> = pending.into_values().collect();
                unconfirmed.sort_by_key(|p| p.index);
                for p in unconfirmed {
                    result.add_failure(RecordError::new(
                        p.index,
                        "Document not acknowledged by bulk insert",
                        p.raw.clone(),
                    ));
                }

                tracing::debug!(
                    entity_kind = %self.kind,
                    inserted = result.successful,
                    rejected = result.failed,
                    "Bulk insert completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    entity_kind = %self.kind,
                    error = %e,
                    documents = prepared.len(),
                    "Bulk insert failed, falling back to single inserts"
                );
                result.used_fallback = true;
                self.insert_sequentially(prepared, tracker, &mut result)
                    .await;
            }
        }

        result
    }

    /// Validate each record and wrap the valid ones as documents
    fn prepare<'a>(
        &self,
        records: &'a [RawRecord],
        offset: usize,
        result: &mut BatchResult,
    ) -> Vec<Prepared<'a>> {
        let mut prepared = Vec::with_capacity(records.len());

        for (i, raw) in records.iter().enumerate() {
            let index = offset + i;
            let record = match CanonicalRecord::from_raw(self.kind, raw) {
                Ok(record) => record,
                Err(e) => {
                    tracing::debug!(record_index = index, error = %e, "Record failed validation");
                    result.add_skipped(RecordError::new(index, e.to_string(), raw.clone()));
                    continue;
                }
            };

            match StoredDocument::from_record(&record) {
                Ok(document) => prepared.push(Prepared {
                    index,
                    raw,
                    document,
                }),
                Err(e) => result.add_failure(RecordError::new(
                    index,
                    format!("Failed to serialize record: {e}"),
                    raw.clone(),
                )),
            }
        }

        prepared
    }

    async fn insert_sequentially(
        &self,
        prepared: Vec<Prepared<'_>>,
        tracker: &mut ImportTracker,
        result: &mut BatchResult,
    ) {
        for p in prepared {
            match self.store.insert_one(self.kind, p.document).await {
                Ok(id) => {
                    tracker.track_record(id);
                    result.add_success();
                }
                // Ids are generated per run, so the failed bulk call committed this one
                Err(BulkloadError::DocumentExists(id)) => {
                    tracing::debug!(
                        record_index = p.index,
                        document_id = %id,
                        "Document stored by the failed bulk call"
                    );
                    tracker.track_record(id);
                    result.add_success();
                }
                Err(e) => {
                    tracing::debug!(record_index = p.index, error = %e, "Single insert failed");
                    result.add_failure(RecordError::new(p.index, e.to_string(), p.raw.clone()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::traits::BulkInsertResult;
    use crate::adapters::memory::MemoryStore;
    use crate::config::MemoryBulkMode;
    use crate::domain::{ImportType, Result};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn processor(store: Arc<MemoryStore>) -> BatchProcessor {
        BatchProcessor::new(store, EntityKind::Users, BatchConfig::default())
    }

    fn tracker(store: Arc<MemoryStore>) -> ImportTracker {
        ImportTracker::new(store, EntityKind::Users, ImportType::Bulk, None)
    }

    #[test]
    fn test_batch_config() {
        let config = BatchConfig::new(0, Duration::from_secs(5));
        assert_eq!(config.batch_size, 1);

        let config = BatchConfig::new(1000, Duration::from_secs(5));
        assert_eq!(config.total_batches(0), 0);
        assert_eq!(config.total_batches(1000), 1);
        assert_eq!(config.total_batches(1001), 2);
    }

    #[test]
    fn test_batch_result_operations() {
        let mut result = BatchResult::new();
        result.add_success();
        result.add_success();
        result.add_failure(RecordError::new(2, "duplicate key", RawRecord::new()));
        result.add_skipped(RecordError::new(3, "Missing required field: email", RawRecord::new()));

        assert_eq!(result.successful, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.processed(), 4);
        assert_eq!(result.errors.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_records_are_skipped_with_raw_data() {
        let store = Arc::new(MemoryStore::new(MemoryBulkMode::Continue));
        let mut tracker = tracker(store.clone());
        let records = vec![
            raw(json!({"email": "a@b.com", "fullName": "A"})),
            raw(json!({"fullName": "No Email"})),
        ];

        let result = processor(store.clone())
            .process_batch(&records, 10, &mut tracker)
            .await;

        assert_eq!(result.successful, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors[0].record_index, 11);
        assert_eq!(result.errors[0].raw_data, records[1]);
        assert_eq!(tracker.records_imported(), 1);
        assert_eq!(store.count(EntityKind::Users).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_all_invalid_skips_storage() {
        let store = Arc::new(MemoryStore::new(MemoryBulkMode::Continue));
        let mut tracker = tracker(store.clone());
        let records = vec![raw(json!({})), raw(json!({"email": "x@y.z"}))];

        let result = processor(store.clone())
            .process_batch(&records, 0, &mut tracker)
            .await;

        assert_eq!(result.skipped, 2);
        assert!(!result.used_fallback);
        assert_eq!(tracker.records_imported(), 0);
    }

    #[tokio::test]
    async fn test_rejections_in_bulk_call_count_as_failed() {
        let store = Arc::new(MemoryStore::new(MemoryBulkMode::Continue));
        let mut tracker = tracker(store.clone());
        let records = vec![
            raw(json!({"email": "dup@b.com", "fullName": "A"})),
            raw(json!({"email": "DUP@b.com", "fullName": "B"})),
        ];

        let result = processor(store.clone())
            .process_batch(&records, 0, &mut tracker)
            .await;

        assert_eq!(result.successful, 1);
        assert_eq!(result.failed, 1);
        assert!(!result.used_fallback);
        assert_eq!(result.errors[0].record_index, 1);
        assert_eq!(tracker.records_imported(), 1);
    }

    #[tokio::test]
    async fn test_aborted_bulk_call_falls_back() {
        let store = Arc::new(MemoryStore::new(MemoryBulkMode::AbortOnConflict));
        let mut tracker = tracker(store.clone());
        let records = vec![
            raw(json!({"email": "one@b.com", "fullName": "A"})),
            raw(json!({"email": "one@b.com", "fullName": "B"})),
            raw(json!({"email": "two@b.com", "fullName": "C"})),
        ];

        let result = processor(store.clone())
            .process_batch(&records, 0, &mut tracker)
            .await;

        assert!(result.used_fallback);
        assert_eq!(result.successful, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors[0].record_index, 1);
        assert_eq!(tracker.records_imported(), 2);
        assert_eq!(store.count(EntityKind::Users).await.unwrap(), 2);
    }

    /// Stores every document, then reports the bulk call as timed out
    struct CommitThenTimeout {
        inner: MemoryStore,
    }

    #[async_trait]
    impl DocumentStore for CommitThenTimeout {
        async fn test_connection(&self) -> Result<()> {
            Ok(())
        }

        async fn ensure_collection_exists(&self, kind: EntityKind) -> Result<()> {
            self.inner.ensure_collection_exists(kind).await
        }

        async fn insert_many(
            &self,
            kind: EntityKind,
            documents: Vec<StoredDocument>,
            timeout: Duration,
        ) -> Result<BulkInsertResult> {
            self.inner.insert_many(kind, documents, timeout).await?;
            Err(BulkloadError::Connection("bulk insert timed out".to_string()))
        }

        async fn insert_one(
            &self,
            kind: EntityKind,
            document: StoredDocument,
        ) -> Result<DocumentId> {
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
            "commit-then-timeout"
        }
    }

    #[tokio::test]
    async fn test_documents_committed_by_failed_bulk_call_are_tracked() {
        let documents = Arc::new(CommitThenTimeout {
            inner: MemoryStore::default(),
        });
        let sessions = Arc::new(MemoryStore::default());
        let mut tracker = tracker(sessions);
        let records = vec![
            raw(json!({"email": "one@b.com", "fullName": "A"})),
            raw(json!({"email": "two@b.com", "fullName": "B"})),
            raw(json!({"email": "three@b.com", "fullName": "C"})),
        ];

        let result = BatchProcessor::new(documents.clone(), EntityKind::Users, BatchConfig::default())
            .process_batch(&records, 0, &mut tracker)
            .await;

        assert!(result.used_fallback);
        assert_eq!(result.successful, 3);
        assert_eq!(result.failed, 0);
        assert!(result.errors.is_empty());
        assert_eq!(tracker.records_imported(), 3);

        let stored: Vec<DocumentId> = documents
            .inner
            .documents(EntityKind::Users)
            .await
            .into_iter()
            .map(|doc| doc.id)
            .collect();
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().all(|id| tracker.session().imported_ids.contains(id)));
    }
}
