//! Domain error types
//!
//! This module defines the error hierarchy for Bulkload. Errors are domain-specific
//! and don't expose third-party driver types.

use super::ids::DocumentId;
use thiserror::Error;

/// Main Bulkload error type
///
/// Only [`BulkloadError::Source`] and [`BulkloadError::Configuration`] abort an import
/// run on their own; record and batch level failures are absorbed into the run statistics.
#[derive(Debug, Error)]
pub enum BulkloadError {
    /// Configuration-related errors (unknown entity kind, invalid settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Source file errors (missing file, unparsable content, unexpected shape)
    #[error("Source error: {0}")]
    Source(String),

    /// A record that failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Cosmos DB-related errors
    #[error("Cosmos DB error: {0}")]
    CosmosDb(#[from] CosmosDbError),

    /// Database-related errors (generic)
    #[error("Database error: {0}")]
    Database(String),

    /// A single insert hit a document with the same id
    #[error("Document already exists: {0}")]
    DocumentExists(DocumentId),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Import session persistence errors
    #[error("Session error: {0}")]
    State(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl BulkloadError {
    /// Returns true for errors that terminate a run before or outside batch processing
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BulkloadError::Configuration(_)
                | BulkloadError::Source(_)
                | BulkloadError::Connection(_)
                | BulkloadError::State(_)
        )
    }
}

/// Per-record validation failures
///
/// A validation error never aborts a run: the offending record is skipped and the
/// message is recorded next to its raw data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field holds a value outside its allowed set
    #[error("Invalid value '{value}' for field '{field}', expected one of: {allowed}")]
    InvalidValue {
        field: &'static str,
        value: String,
        allowed: String,
    },

    /// A field holds a value of the wrong shape
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Cosmos DB-specific errors
///
/// Errors that occur when interacting with Azure Cosmos DB.
#[derive(Debug, Error)]
pub enum CosmosDbError {
    /// Failed to connect to Cosmos DB
    #[error("Failed to connect to Cosmos DB: {0}")]
    ConnectionFailed(String),

    /// Database not found
    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    /// Failed to create container
    #[error("Failed to create container: {0}")]
    ContainerCreationFailed(String),

    /// Failed to insert document
    #[error("Failed to insert document: {0}")]
    InsertFailed(String),

    /// Failed to delete document
    #[error("Failed to delete document: {0}")]
    DeleteFailed(String),

    /// Failed to query documents
    #[error("Failed to query documents: {0}")]
    QueryFailed(String),

    /// Conflict error (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Failed to write document
    #[error("Failed to write document: {0}")]
    WriteFailed(String),

    /// Failed to deserialize response
    #[error("Failed to deserialize response: {0}")]
    DeserializationFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for BulkloadError {
    fn from(err: std::io::Error) -> Self {
        BulkloadError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for BulkloadError {
    fn from(err: serde_json::Error) -> Self {
        BulkloadError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for BulkloadError {
    fn from(err: toml::de::Error) -> Self {
        BulkloadError::Configuration(format!("TOML parse error: {err}"))
    }
}
