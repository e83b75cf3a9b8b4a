//! Domain identifier types
//!
//! Newtype wrappers for import session and stored document identifiers so the two
//! can't be mixed up when tracking provenance.

use super::entity::{EntityKind, ImportType};
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SESSION_SUFFIX_LEN: usize = 8;

/// Import session identifier
///
/// Format: `{entity_kind}_{import_type}_{yyyyMMddHHmmssSSS}_{suffix}` where the suffix
/// is eight random lowercase alphanumerics.
///
/// # Examples
///
/// ```
/// use bulkload::domain::{EntityKind, ImportType, SessionId};
///
/// let id = SessionId::generate(EntityKind::Users, ImportType::Seed);
/// assert!(id.as_str().starts_with("users_seed_"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Generates a fresh session id for a run starting now
    pub fn generate(kind: EntityKind, import_type: ImportType) -> Self {
        Self::generate_at(kind, import_type, Utc::now())
    }

    /// Generates a session id anchored at the given instant
    pub fn generate_at(kind: EntityKind, import_type: ImportType, at: DateTime<Utc>) -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_SUFFIX_LEN)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();

        Self(format!(
            "{}_{}_{}_{}",
            kind.as_str(),
            import_type.as_str(),
            at.format("%Y%m%d%H%M%S%3f"),
            suffix
        ))
    }

    /// Wraps an existing session id (e.g. one read back from storage)
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Session ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the session ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of a document written by the importer
///
/// Assigned before the first storage attempt so the bulk and fallback paths
/// report the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new random document id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wraps an existing document id
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Document ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the document ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
