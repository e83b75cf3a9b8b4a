//! Import statistics and reporting
//!
//! This module defines structures for tracking and reporting import results.

use super::batch::BatchResult;
use crate::core::tracker::SessionStatus;
use crate::domain::RawRecord;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Default cap on the number of errors kept in [`ImportStats::errors`]
pub const DEFAULT_MAX_RECORDED_ERRORS: usize = 1000;

/// A record that was skipped or failed to insert
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordError {
    /// 0-based position in the source sequence
    pub record_index: usize,

    /// Human-readable reason
    pub message: String,

    /// The record as read from the source, unmodified
    pub raw_data: RawRecord,
}

impl RecordError {
    pub fn new(record_index: usize, message: impl Into<String>, raw_data: RawRecord) -> Self {
        Self {
            record_index,
            message: message.into(),
            raw_data,
        }
    }
}

/// Progress event emitted after each batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportProgress {
    /// 1-based batch number
    pub batch: usize,
    pub total_batches: usize,
    pub processed: usize,
    pub total: usize,
    pub percent: f64,
}

impl ImportProgress {
    pub fn new(batch: usize, total_batches: usize, processed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100.0
        } else {
            (processed as f64 / total as f64) * 100.0
        };
        Self {
            batch,
            total_batches,
            processed,
            total,
            percent,
        }
    }
}

/// Counters and errors for one import run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    /// Number of records read from the source
    pub total_records: usize,

    /// Documents stored
    pub successful_inserts: usize,

    /// Valid records the store rejected
    pub failed_inserts: usize,

    /// Records that failed validation
    pub skipped_records: usize,

    /// Recorded errors, capped at `max_recorded_errors`
    pub errors: Vec<RecordError>,

    /// Errors not kept because the list was full
    pub errors_dropped: usize,

    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,

    /// The run stopped at a batch boundary on a shutdown signal
    pub interrupted: bool,

    #[serde(skip)]
    max_recorded_errors: usize,
}

impl ImportStats {
    /// Start a new run's statistics now
    pub fn new(max_recorded_errors: usize) -> Self {
        Self {
            total_records: 0,
            successful_inserts: 0,
            failed_inserts: 0,
            skipped_records: 0,
            errors: Vec::new(),
            errors_dropped: 0,
            start_time: Utc::now(),
            end_time: None,
            interrupted: false,
            max_recorded_errors,
        }
    }

    /// Keep an error if there is room, otherwise only count it
    pub fn add_error(&mut self, error: RecordError) {
        if self.errors.len() < self.max_recorded_errors {
            self.errors.push(error);
        } else {
            self.errors_dropped += 1;
        }
    }

    /// Merge a batch result into the run totals
    pub fn merge(&mut self, batch: BatchResult) {
        self.successful_inserts += batch.successful;
        self.failed_inserts += batch.failed;
        self.skipped_records += batch.skipped;
        for error in batch.errors {
            self.add_error(error);
        }
    }

    /// Records accounted for so far
    pub fn processed(&self) -> usize {
        self.successful_inserts + self.failed_inserts + self.skipped_records
    }

    /// Total number of errors, including those not kept
    pub fn error_count(&self) -> usize {
        self.errors.len() + self.errors_dropped
    }

    /// Stamp the end time
    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }

    /// Elapsed time, up to now if the run has not finished
    pub fn duration(&self) -> Duration {
        self.end_time.unwrap_or_else(Utc::now) - self.start_time
    }

    /// Stored documents as a percentage of records read
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            return 100.0;
        }
        (self.successful_inserts as f64 / self.total_records as f64) * 100.0
    }

    /// Terminal status of the run
    ///
    /// An interrupted run is `partial` if anything was stored and `failed` otherwise.
    pub fn status(&self) -> SessionStatus {
        if self.interrupted {
            return if self.successful_inserts > 0 {
                SessionStatus::Partial
            } else {
                SessionStatus::Failed
            };
        }
        SessionStatus::classify(self.successful_inserts, self.failed_inserts)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_records = self.total_records,
            successful = self.successful_inserts,
            failed = self.failed_inserts,
            skipped = self.skipped_records,
            interrupted = self.interrupted,
            duration_ms = self.duration().num_milliseconds(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Import summary"
        );

        if self.error_count() > 0 {
            tracing::warn!(
                recorded = self.errors.len(),
                dropped = self.errors_dropped,
                "Import completed with errors"
            );
            for error in self.errors.iter().take(10) {
                tracing::debug!(
                    record_index = error.record_index,
                    message = %error.message,
                    "Record error"
                );
            }
        }
    }
}

impl Default for ImportStats {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECORDED_ERRORS)
    }
}
