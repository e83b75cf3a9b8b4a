//! Logging and observability
//!
//! Structured logging via `tracing`, with console output and optional rotating
//! JSON files.
//!
//! ```no_run
//! use bulkload::logging::init_logging;
//! use bulkload::config::LoggingConfig;
//!
//! let _guard = init_logging("info", &LoggingConfig::default()).expect("logging");
//! tracing::info!(entity_kind = "users", "Import started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an import run
///
/// ```no_run
/// use bulkload::log_import_start;
/// use bulkload::domain::EntityKind;
///
/// log_import_start!(EntityKind::Users, "users.csv", "users_bulk_20250101000000000_abcd1234");
/// ```
#[macro_export]
macro_rules! log_import_start {
    ($kind:expr, $file:expr, $session_id:expr) => {
        tracing::info!(
            entity_kind = %$kind,
            file = %$file,
            session_id = %$session_id,
            "Starting import"
        );
    };
}

/// Log the completion of an import run
#[macro_export]
macro_rules! log_import_complete {
    ($session_id:expr, $successful:expr, $failed:expr, $skipped:expr, $duration:expr) => {
        tracing::info!(
            session_id = %$session_id,
            successful = $successful,
            failed = $failed,
            skipped = $skipped,
            duration_ms = $duration.num_milliseconds(),
            "Import completed"
        );
    };
}

/// Log an error with context
///
/// ```no_run
/// use bulkload::log_error_with_context;
/// use bulkload::domain::BulkloadError;
///
/// let error = BulkloadError::Source("file not found".to_string());
/// log_error_with_context!(&error, "Failed to load source file");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log progress after a batch
///
/// ```no_run
/// use bulkload::log_batch_processing;
///
/// log_batch_processing!(2, 5, 2000, 4500);
/// ```
#[macro_export]
macro_rules! log_batch_processing {
    ($batch:expr, $total_batches:expr, $processed:expr, $total:expr) => {
        tracing::debug!(
            batch = $batch,
            total_batches = $total_batches,
            processed = $processed,
            total = $total,
            progress_pct = if $total == 0 {
                100.0
            } else {
                $processed as f64 / $total as f64 * 100.0
            },
            "Processed batch"
        );
    };
}
