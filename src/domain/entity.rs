//! Entity kinds and import types
//!
//! The entity kind is the explicit discriminator that selects a validator, a target
//! collection, and the JSON wrapper keys a source file may use.

use super::errors::BulkloadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of business record being imported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Customer organizations
    Organizations,
    /// User accounts
    Users,
    /// Application configuration objects
    Configurations,
    /// Page activity logs
    ActivityLogs,
}

impl EntityKind {
    /// Every supported kind, in a stable order
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Organizations,
        EntityKind::Users,
        EntityKind::Configurations,
        EntityKind::ActivityLogs,
    ];

    /// Canonical name, also used as the collection name
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Organizations => "organizations",
            EntityKind::Users => "users",
            EntityKind::Configurations => "configurations",
            EntityKind::ActivityLogs => "activity_logs",
        }
    }

    /// Keys under which a JSON source object may wrap its record array
    pub fn json_keys(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Organizations => &["organizations"],
            EntityKind::Users => &["users"],
            EntityKind::Configurations => &["configurations"],
            EntityKind::ActivityLogs => &["activity_logs", "activityLogs"],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = BulkloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "organizations" | "organization" => Ok(EntityKind::Organizations),
            "users" | "user" => Ok(EntityKind::Users),
            "configurations" | "configuration" | "configs" => Ok(EntityKind::Configurations),
            "activity_logs" | "activitylogs" | "activity_log" => Ok(EntityKind::ActivityLogs),
            other => Err(BulkloadError::Configuration(format!(
                "Unknown entity kind '{other}'. Must be one of: organizations, users, configurations, activity_logs"
            ))),
        }
    }
}

/// How an import run was initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImportType {
    /// File-driven bulk import
    #[default]
    Bulk,
    /// Operator-driven one-off import
    Manual,
    /// Fixture or demo data
    Seed,
}

impl ImportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportType::Bulk => "bulk",
            ImportType::Manual => "manual",
            ImportType::Seed => "seed",
        }
    }
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportType {
    type Err = BulkloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bulk" => Ok(ImportType::Bulk),
            "manual" => Ok(ImportType::Manual),
            "seed" => Ok(ImportType::Seed),
            other => Err(BulkloadError::Configuration(format!(
                "Unknown import type '{other}'. Must be one of: bulk, manual, seed"
            ))),
        }
    }
}
