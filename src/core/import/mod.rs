//! Import orchestration and batch processing
//!
//! This module provides the core import logic for Bulkload, including:
//! - Batch validation and storage with a single-insert fallback
//! - Run coordination and terminal status
//! - Statistics and reporting

pub mod batch;
pub mod coordinator;
pub mod summary;

pub use batch::{BatchConfig, BatchProcessor, BatchResult};
pub use coordinator::{ImportCoordinator, ImportReport, ImportRequest};
pub use summary::{ImportProgress, ImportStats, RecordError};
