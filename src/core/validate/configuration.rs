//! Application configuration validation

use super::fields::{object_or_empty, required, text};
use crate::domain::{AppSettings, Configuration, RawRecord, ValidationError};
use serde_json::Value;

pub const DEFAULT_APP_NAME: &str = "Default App";

/// Validate and normalise a configuration record
///
/// `appId` is required. `settings` may be an object or a string holding one; its
/// `appName` falls back to a top-level `appName`, then to [`DEFAULT_APP_NAME`].
pub fn validate_configuration(raw: &RawRecord) -> Result<Configuration, ValidationError> {
    let app_id = required(raw, "appId")?;
    let mut settings = object_or_empty(raw, "settings")?;

    let app_name = text(&settings, "appName")
        .or_else(|| text(raw, "appName"))
        .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

    let features = match settings.remove("features") {
        Some(Value::Object(map)) => map,
        _ => Default::default(),
    };
    let preferences = match settings.remove("preferences") {
        Some(Value::Object(map)) => map,
        _ => Default::default(),
    };

    Ok(Configuration {
        app_id,
        settings: AppSettings {
            app_name,
            features,
            preferences,
        },
    })
}
