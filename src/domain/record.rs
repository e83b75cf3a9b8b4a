//! Record domain models
//!
//! Raw records as produced by the source reader, the canonical record shape for each
//! entity kind, and the document envelope written to storage.

use super::entity::EntityKind;
use super::ids::DocumentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record exactly as read from the source file
///
/// CSV rows hold string values only; JSON rows keep their original value types.
/// Field order follows the source.
pub type RawRecord = Map<String, Value>;

/// Lifecycle status of an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl OrganizationStatus {
    pub const ALLOWED: &'static [&'static str] = &["active", "inactive", "suspended"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

/// Feature usage counters tracked per organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationUsage {
    pub users_count: i64,
    pub messages_sent: i64,
    /// Legacy name of `messages_sent`, still read by older consumers
    pub message_count: i64,
    pub storage_used_mb: f64,
}

/// Canonical organization record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub name: String,
    pub contact_email: String,
    pub status: OrganizationStatus,
    pub plan: String,
    pub monthly_price: f64,
    pub usage: OrganizationUsage,
}

/// Role of a user within its organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Member,
}

impl UserRole {
    pub const ALLOWED: &'static [&'static str] = &["admin", "member"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            _ => None,
        }
    }
}

/// Canonical user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Nested settings of a configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub app_name: String,
    pub features: Map<String, Value>,
    pub preferences: Map<String, Value>,
}

/// Canonical application configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub app_id: String,
    pub settings: AppSettings,
}

/// Canonical activity log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub user_id: String,
    pub page_name: String,
    pub action: String,
    pub duration_ms: i64,
    pub timestamp: DateTime<Utc>,
    pub metadata: Map<String, Value>,
}

/// A validated record of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entityKind", rename_all = "snake_case")]
pub enum CanonicalRecord {
    #[serde(rename = "organizations")]
    Organization(Organization),
    #[serde(rename = "users")]
    User(User),
    #[serde(rename = "configurations")]
    Configuration(Configuration),
    #[serde(rename = "activity_logs")]
    ActivityLog(ActivityLog),
}

impl CanonicalRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            CanonicalRecord::Organization(_) => EntityKind::Organizations,
            CanonicalRecord::User(_) => EntityKind::Users,
            CanonicalRecord::Configuration(_) => EntityKind::Configurations,
            CanonicalRecord::ActivityLog(_) => EntityKind::ActivityLogs,
        }
    }

    /// Storage-level uniqueness key, if the kind has one
    ///
    /// Emails compare case-insensitively; activity logs have no natural key.
    pub fn natural_key(&self) -> Option<String> {
        match self {
            CanonicalRecord::Organization(org) => Some(org.contact_email.to_lowercase()),
            CanonicalRecord::User(user) => Some(user.email.to_lowercase()),
            CanonicalRecord::Configuration(config) => Some(config.app_id.clone()),
            CanonicalRecord::ActivityLog(_) => None,
        }
    }

    /// The record's fields as a JSON object, without the kind tag
    pub fn to_body(&self) -> serde_json::Result<Map<String, Value>> {
        let value = match self {
            CanonicalRecord::Organization(r) => serde_json::to_value(r)?,
            CanonicalRecord::User(r) => serde_json::to_value(r)?,
            CanonicalRecord::Configuration(r) => serde_json::to_value(r)?,
            CanonicalRecord::ActivityLog(r) => serde_json::to_value(r)?,
        };
        match value {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

/// Document envelope handed to a storage backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub id: DocumentId,
    pub entity_kind: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natural_key: Option<String>,
    pub body: Map<String, Value>,
}

impl StoredDocument {
    /// Wraps a canonical record under a freshly generated id
    pub fn from_record(record: &CanonicalRecord) -> serde_json::Result<Self> {
        Ok(Self {
            id: DocumentId::generate(),
            entity_kind: record.kind(),
            natural_key: record.natural_key(),
            body: record.to_body()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_org() -> Organization {
        Organization {
            name: "Acme, Inc.".to_string(),
            contact_email: "Ops@Acme.com".to_string(),
            status: OrganizationStatus::Active,
            plan: "free".to_string(),
            monthly_price: 0.0,
            usage: OrganizationUsage::default(),
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            OrganizationStatus::parse(" Suspended "),
            Some(OrganizationStatus::Suspended)
        );
        assert_eq!(OrganizationStatus::parse("closed"), None);
        assert_eq!(UserRole::parse("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::default(), UserRole::Member);
    }

    #[test]
    fn test_canonical_record_tagging() {
        let record = CanonicalRecord::Organization(sample_org());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["entityKind"], "organizations");
        assert_eq!(value["contactEmail"], "Ops@Acme.com");
        assert_eq!(value["usage"]["messageCount"], 0);
    }

    #[test]
    fn test_natural_key_lowercases_email() {
        let record = CanonicalRecord::Organization(sample_org());
        assert_eq!(record.natural_key().as_deref(), Some("ops@acme.com"));

        let log = CanonicalRecord::ActivityLog(ActivityLog {
            user_id: "u1".to_string(),
            page_name: "home".to_string(),
            action: "view".to_string(),
            duration_ms: 0,
            timestamp: Utc::now(),
            metadata: Map::new(),
        });
        assert!(log.natural_key().is_none());
    }

    #[test]
    fn test_stored_document_from_record() {
        let record = CanonicalRecord::Organization(sample_org());
        let doc = StoredDocument::from_record(&record).unwrap();
        assert_eq!(doc.entity_kind, EntityKind::Organizations);
        assert_eq!(doc.body.get("name"), Some(&json!("Acme, Inc.")));
        assert!(!doc.body.contains_key("entityKind"));
    }
}
