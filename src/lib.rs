// Bulkload - Batch record importer for document stores
// Copyright (c) 2025 Bulkload Contributors
// Licensed under the MIT License

//! # Bulkload - Batch Record Importer
//!
//! Bulkload reads business records (organizations, users, configurations, and
//! activity logs) from JSON or CSV files, validates and normalizes them, and stores
//! them in PostgreSQL or Azure Cosmos DB in batches.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Reading** JSON arrays, wrapped JSON objects, and CSV files with quoted fields
//! - **Validating** records per entity kind with defaults and normalization
//! - **Loading** documents in bulk with a per-record fallback when a bulk call fails
//! - **Tracking** every stored document id per import session, so imported data can
//!   be removed again without touching anything else
//!
//! ## Architecture
//!
//! Bulkload follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (source reading, validation, import, tracking)
//! - [`adapters`] - Storage backends (PostgreSQL, Cosmos DB, in-memory)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bulkload::adapters::memory::MemoryStore;
//! use bulkload::config::MemoryBulkMode;
//! use bulkload::core::import::{ImportCoordinator, ImportRequest};
//! use bulkload::domain::EntityKind;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new(MemoryBulkMode::Continue));
//!     let coordinator = ImportCoordinator::new(store.clone(), store);
//!
//!     let report = coordinator
//!         .run(ImportRequest::new(EntityKind::Organizations, "organizations.json"))
//!         .await?;
//!
//!     println!(
//!         "Imported {} organizations ({})",
//!         report.stats.successful_inserts,
//!         report.status()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Scoped Cleanup
//!
//! Every run persists an import session listing the ids it created. Clearing by
//! entity kind (and optionally import type) deletes exactly those documents:
//!
//! ```rust,no_run
//! use bulkload::adapters::memory::MemoryStore;
//! use bulkload::config::MemoryBulkMode;
//! use bulkload::core::tracker::SessionManager;
//! use bulkload::domain::{EntityKind, ImportType};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new(MemoryBulkMode::Continue));
//! let manager = SessionManager::new(store.clone(), store);
//!
//! let cleared = manager
//!     .clear_imported_data(EntityKind::Users, Some(ImportType::Seed))
//!     .await?;
//! println!("Deleted {} documents", cleared.documents_deleted);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Bulkload uses the [`domain::BulkloadError`] type for all errors. Only source and
//! configuration errors abort a run; invalid records and failed inserts are counted
//! in the run statistics instead.
//!
//! ## Logging
//!
//! Bulkload uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(entity_kind = "users", "Starting import");
//! warn!(batch = 3, "Bulk insert failed, falling back to single inserts");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
