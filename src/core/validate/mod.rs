//! Record validation
//!
//! One validator per entity kind. Each checks required fields, applies defaults,
//! coerces numbers, and produces the canonical record stored by the backends.
//! Failures are per record and never abort a run.

pub mod activity;
pub mod configuration;
pub mod fields;
pub mod organization;
pub mod user;

pub use activity::validate_activity_log;
pub use configuration::validate_configuration;
pub use organization::validate_organization;
pub use user::validate_user;

use crate::domain::{CanonicalRecord, EntityKind, RawRecord, ValidationError};

/// Validate a raw record with the validator selected by `kind`
pub fn validate_record(
    kind: EntityKind,
    raw: &RawRecord,
) -> Result<CanonicalRecord, ValidationError> {
    match kind {
        EntityKind::Organizations => validate_organization(raw).map(CanonicalRecord::Organization),
        EntityKind::Users => validate_user(raw).map(CanonicalRecord::User),
        EntityKind::Configurations => {
            validate_configuration(raw).map(CanonicalRecord::Configuration)
        }
        EntityKind::ActivityLogs => validate_activity_log(raw).map(CanonicalRecord::ActivityLog),
    }
}

impl CanonicalRecord {
    /// Build the canonical form of a raw record of the given kind
    pub fn from_raw(kind: EntityKind, raw: &RawRecord) -> Result<Self, ValidationError> {
        validate_record(kind, raw)
    }
}
