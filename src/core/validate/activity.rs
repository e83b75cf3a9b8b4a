//! Activity log validation

use super::fields::{int_or_zero, object_or_empty, required, text};
use crate::domain::{ActivityLog, RawRecord, ValidationError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

pub const DEFAULT_ACTION: &str = "view";

/// Validate and normalise an activity log record
///
/// `userId` and `pageName` are required. The timestamp is parsed leniently and
/// falls back to the current time when absent or unparsable.
pub fn validate_activity_log(raw: &RawRecord) -> Result<ActivityLog, ValidationError> {
    Ok(ActivityLog {
        user_id: required(raw, "userId")?,
        page_name: required(raw, "pageName")?,
        action: text(raw, "action").unwrap_or_else(|| DEFAULT_ACTION.to_string()),
        duration_ms: int_or_zero(raw, "durationMs"),
        timestamp: raw
            .get("timestamp")
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now),
        metadata: object_or_empty(raw, "metadata")?,
    })
}

/// Lenient timestamp parsing
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, bare dates, and
/// epoch milliseconds as a number or numeric string. Naive values are taken as UTC.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(naive.and_utc());
                }
            }
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
            }
            s.parse::<i64>()
                .ok()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        }
        _ => None,
    }
}
