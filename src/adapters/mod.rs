//! Storage backends for Bulkload.
//!
//! - [`database`] - Storage traits and the backend factory
//! - [`postgresql`] - PostgreSQL implementation
//! - [`cosmosdb`] - Azure Cosmos DB implementation
//! - [`memory`] - Process-local implementation for dry runs and tests
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies. The
//! import pipeline only sees [`database::DocumentStore`] and
//! [`database::SessionStore`], so a backend can be swapped by configuration alone.
//!
//! ```rust
//! use bulkload::adapters::database::DocumentStore;
//! use bulkload::adapters::memory::MemoryStore;
//! use bulkload::domain::EntityKind;
//!
//! # async fn example() -> bulkload::domain::Result<()> {
//! let store = MemoryStore::default();
//! store.ensure_collection_exists(EntityKind::Users).await?;
//! assert_eq!(store.count(EntityKind::Users).await?, 0);
//! # Ok(())
//! # }
//! ```

pub mod cosmosdb;
pub mod database;
pub mod memory;
pub mod postgresql;
