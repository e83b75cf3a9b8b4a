//! Import coordinator - main orchestrator for one import run
//!
//! Coordinates the source reader, batch processor, and import tracker, and decides
//! the terminal status of the run.

use super::batch::{BatchConfig, BatchProcessor, DEFAULT_BATCH_SIZE};
use super::summary::{ImportProgress, ImportStats, DEFAULT_MAX_RECORDED_ERRORS};
use crate::adapters::database::traits::{DocumentStore, SessionStore};
use crate::config::ImportConfig;
use crate::core::source::{self, SourceFormat};
use crate::core::tracker::{ImportSession, ImportTracker, SessionStatus};
use crate::domain::{EntityKind, ImportType, RawRecord, Result};
use crate::{log_batch_processing, log_error_with_context, log_import_complete, log_import_start};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Everything that describes one import run
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub entity_kind: EntityKind,
    pub file_path: PathBuf,
    /// Inferred from the file extension when `None`
    pub format: Option<SourceFormat>,
    pub batch_size: usize,
    /// Delete every document of the kind before importing
    pub clear_existing: bool,
    pub validate_data: bool,
    pub import_type: ImportType,
    pub bulk_timeout: Duration,
    pub max_recorded_errors: usize,
    /// Upsert the session after each batch that stored records
    pub checkpoint_sessions: bool,
}

impl ImportRequest {
    /// A request with default settings
    pub fn new(entity_kind: EntityKind, file_path: impl Into<PathBuf>) -> Self {
        Self {
            entity_kind,
            file_path: file_path.into(),
            format: None,
            batch_size: DEFAULT_BATCH_SIZE,
            clear_existing: false,
            validate_data: true,
            import_type: ImportType::default(),
            bulk_timeout: Duration::from_secs(30),
            max_recorded_errors: DEFAULT_MAX_RECORDED_ERRORS,
            checkpoint_sessions: false,
        }
    }

    /// A request taking its settings from the `[import]` configuration section
    pub fn from_config(
        entity_kind: EntityKind,
        file_path: impl Into<PathBuf>,
        config: &ImportConfig,
    ) -> Self {
        Self {
            entity_kind,
            file_path: file_path.into(),
            format: None,
            batch_size: config.batch_size,
            clear_existing: false,
            validate_data: config.validate_data,
            import_type: config.default_import_type,
            bulk_timeout: Duration::from_secs(config.bulk_timeout_secs),
            max_recorded_errors: config.max_recorded_errors,
            checkpoint_sessions: config.checkpoint_sessions,
        }
    }

    fn file_name(&self) -> Option<String> {
        self.file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}

/// Outcome of a run that reached its end
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub stats: ImportStats,
    pub session: ImportSession,
}

impl ImportReport {
    pub fn status(&self) -> SessionStatus {
        self.session.status
    }
}

/// Import coordinator
pub struct ImportCoordinator {
    documents: Arc<dyn DocumentStore>,
    sessions: Arc<dyn SessionStore>,
    shutdown_signal: Option<watch::Receiver<bool>>,
    progress: Option<mpsc::UnboundedSender<ImportProgress>>,
}

impl ImportCoordinator {
    /// Create a new import coordinator
    pub fn new(documents: Arc<dyn DocumentStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            documents,
            sessions,
            shutdown_signal: None,
            progress: None,
        }
    }

    /// Stop at the next batch boundary once the signal reads `true`
    pub fn with_shutdown_signal(mut self, shutdown_signal: watch::Receiver<bool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    /// Send a progress event after each batch
    pub fn with_progress(mut self, progress: mpsc::UnboundedSender<ImportProgress>) -> Self {
        self.progress = Some(progress);
        self
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .is_some_and(|signal| *signal.borrow())
    }

    /// Execute one import run
    ///
    /// Per-record and per-batch failures end up in the report's stats. An `Err` is
    /// returned for source errors, for storage failures before the first batch, and
    /// when the session can't be saved.
    pub async fn run(&self, request: ImportRequest) -> Result<ImportReport> {
        let kind = request.entity_kind;
        let mut tracker = ImportTracker::new(
            self.sessions.clone(),
            kind,
            request.import_type,
            request.file_name(),
        );
        let mut stats = ImportStats::new(request.max_recorded_errors);

        log_import_start!(kind, request.file_path.display(), tracker.session_id());

        if !request.validate_data {
            tracing::warn!("validate_data = false is ignored; records are always validated");
        }

        self.documents.ensure_collection_exists(kind).await?;
        self.sessions.ensure_session_collection_exists().await?;

        let records = match self.load_records(&request).await {
            Ok(records) => records,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load source file");
                if let Err(save_err) = tracker.save_session(SessionStatus::Failed).await {
                    tracing::warn!(error = %save_err, "Could not record failed import session");
                }
                return Err(e);
            }
        };
        stats.total_records = records.len();

        // Only once the source is readable
        if request.clear_existing {
            let deleted = self.documents.delete_all(kind).await?;
            tracing::warn!(
                entity_kind = %kind,
                deleted,
                "Cleared every existing document before import"
            );
        }

        let processor = BatchProcessor::new(
            self.documents.clone(),
            kind,
            BatchConfig::new(request.batch_size, request.bulk_timeout),
        );
        let batch_size = processor.config().batch_size;
        let total_batches = processor.config().total_batches(records.len());

        for (batch_index, window) in records.chunks(batch_size).enumerate() {
            if self.shutdown_requested() {
                tracing::warn!(
                    completed_batches = batch_index,
                    total_batches,
                    "Shutdown requested, stopping before next batch"
                );
                stats.interrupted = true;
                break;
            }

            let result = processor
                .process_batch(window, batch_index * batch_size, &mut tracker)
                .await;
            let stored = result.successful > 0;
            stats.merge(result);

            let batch = batch_index + 1;
            log_batch_processing!(batch, total_batches, stats.processed(), stats.total_records);
            if let Some(progress) = &self.progress {
                // Receiver may be gone; progress is advisory
                let _ = progress.send(ImportProgress::new(
                    batch,
                    total_batches,
                    stats.processed(),
                    stats.total_records,
                ));
            }

            if request.checkpoint_sessions && stored {
                if let Err(e) = tracker.checkpoint().await {
                    tracing::warn!(error = %e, "Failed to checkpoint import session");
                }
            }
        }

        stats.finish();
        let session = tracker.save_session(stats.status()).await?;

        stats.log_summary();
        log_import_complete!(
            session.session_id,
            stats.successful_inserts,
            stats.failed_inserts,
            stats.skipped_records,
            stats.duration()
        );

        Ok(ImportReport { stats, session })
    }

    async fn load_records(&self, request: &ImportRequest) -> Result<Vec<RawRecord>> {
        let format = source::resolve_format(&request.file_path, request.format)?;
        source::load(&request.file_path, format, request.entity_kind).await
    }
}
