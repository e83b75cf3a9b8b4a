//! Domain models and types for Bulkload.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Entity kinds** ([`EntityKind`]) that select validators and target collections
//! - **Records** ([`RawRecord`], [`CanonicalRecord`], [`StoredDocument`])
//! - **Strongly-typed identifiers** ([`SessionId`], [`DocumentId`])
//! - **Error types** ([`BulkloadError`], [`ValidationError`], [`CosmosDbError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, BulkloadError>`]:
//!
//! ```rust
//! use bulkload::domain::{BulkloadError, EntityKind};
//!
//! let err = "invoices".parse::<EntityKind>().unwrap_err();
//! assert!(matches!(err, BulkloadError::Configuration(_)));
//! ```

pub mod entity;
pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use entity::{EntityKind, ImportType};
pub use errors::{BulkloadError, CosmosDbError, ValidationError};
pub use ids::{DocumentId, SessionId};
pub use record::{
    ActivityLog, AppSettings, CanonicalRecord, Configuration, Organization, OrganizationStatus,
    OrganizationUsage, RawRecord, StoredDocument, User, UserRole,
};
pub use result::Result;
