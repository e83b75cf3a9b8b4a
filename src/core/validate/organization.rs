//! Organization validation

use super::fields::{float_or_zero, int_or_zero, is_present, one_of, required, text};
use crate::domain::{
    Organization, OrganizationStatus, OrganizationUsage, RawRecord, ValidationError,
};

pub const DEFAULT_PLAN: &str = "free";

const LEGACY_MESSAGE_COUNT: &str = "messageCount";
const MESSAGES_SENT: &str = "messagesSent";

/// Validate and normalise an organization record
///
/// `name` and `contactEmail` are required. `messageCount` is the legacy spelling of
/// `messagesSent`: when absent it is backfilled from `messagesSent`.
pub fn validate_organization(raw: &RawRecord) -> Result<Organization, ValidationError> {
    let name = required(raw, "name")?;
    let contact_email = required(raw, "contactEmail")?;
    let status = one_of(
        raw,
        "status",
        OrganizationStatus::ALLOWED,
        OrganizationStatus::parse,
        OrganizationStatus::default(),
    )?;

    let messages_sent = int_or_zero(raw, MESSAGES_SENT);
    let message_count = if is_present(raw, LEGACY_MESSAGE_COUNT) {
        int_or_zero(raw, LEGACY_MESSAGE_COUNT)
    } else {
        messages_sent
    };

    Ok(Organization {
        name,
        contact_email,
        status,
        plan: text(raw, "plan").unwrap_or_else(|| DEFAULT_PLAN.to_string()),
        monthly_price: float_or_zero(raw, "monthlyPrice"),
        usage: OrganizationUsage {
            users_count: int_or_zero(raw, "usersCount"),
            messages_sent,
            message_count,
            storage_used_mb: float_or_zero(raw, "storageUsedMb"),
        },
    })
}
