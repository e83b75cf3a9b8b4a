//! Core business logic for Bulkload.
//!
//! # Modules
//!
//! - [`source`] - JSON and CSV source readers
//! - [`validate`] - Per-kind validation into canonical records
//! - [`import`] - Import coordination, batch processing, and statistics
//! - [`tracker`] - Import sessions and scoped clearing of imported data
//!
//! # Import Workflow
//!
//! 1. **Load**: Read every raw record from the source file
//! 2. **Validate**: Check required fields and normalise each record
//! 3. **Batch Process**: Bulk insert valid records, falling back to single inserts
//! 4. **Track**: Record the id of every stored document
//! 5. **Report**: Classify the run and save its import session
//!
//! # Example
//!
//! ```rust,no_run
//! use bulkload::adapters::memory::MemoryStore;
//! use bulkload::core::import::{ImportCoordinator, ImportRequest};
//! use bulkload::domain::EntityKind;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::default());
//! let coordinator = ImportCoordinator::new(store.clone(), store);
//!
//! let report = coordinator
//!     .run(ImportRequest::new(EntityKind::Users, "users.csv"))
//!     .await?;
//!
//! println!("Successful: {}", report.stats.successful_inserts);
//! println!("Failed: {}", report.stats.failed_inserts);
//! println!("Session: {}", report.session.session_id);
//! # Ok(())
//! # }
//! ```

pub mod import;
pub mod source;
pub mod tracker;
pub mod validate;
