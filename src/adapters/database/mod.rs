//! Storage abstraction layer
//!
//! Trait-based abstraction so the import engine works against PostgreSQL,
//! Cosmos DB, or the in-memory store.

pub mod factory;
pub mod traits;

pub use factory::create_stores;
pub use traits::{BulkInsertFailure, BulkInsertResult, DocumentStore, SessionStore};
