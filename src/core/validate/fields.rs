//! Field access and coercion helpers shared by the validators
//!
//! Blank strings and JSON nulls count as absent everywhere.

use crate::domain::{RawRecord, ValidationError};
use serde_json::{Map, Value};

/// Trimmed text value of a field, if present and non-blank
///
/// Numbers and booleans are rendered as text; arrays and objects are not text.
pub fn text(raw: &RawRecord, field: &str) -> Option<String> {
    match raw.get(field)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text value of a required field
pub fn required(raw: &RawRecord, field: &'static str) -> Result<String, ValidationError> {
    text(raw, field).ok_or(ValidationError::MissingField(field))
}

/// Whether a field carries any non-blank value
pub fn is_present(raw: &RawRecord, field: &str) -> bool {
    match raw.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Parse-or-zero integer coercion
///
/// Accepts JSON numbers and numeric strings; fractional values are truncated.
pub fn int_or_zero(raw: &RawRecord, field: &str) -> i64 {
    match raw.get(field) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Parse-or-zero float coercion
pub fn float_or_zero(raw: &RawRecord, field: &str) -> f64 {
    match raw.get(field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Value from a set of allowed options, defaulting when absent
pub fn one_of<T>(
    raw: &RawRecord,
    field: &'static str,
    allowed: &[&str],
    parse: impl Fn(&str) -> Option<T>,
    default: T,
) -> Result<T, ValidationError> {
    match text(raw, field) {
        None => Ok(default),
        Some(value) => parse(&value).ok_or_else(|| ValidationError::InvalidValue {
            field,
            value,
            allowed: allowed.join(", "),
        }),
    }
}

/// JSON object value of a field
///
/// A string holding a JSON object is accepted too, since CSV can only carry text.
/// Absent fields yield an empty map.
pub fn object_or_empty(
    raw: &RawRecord,
    field: &'static str,
) -> Result<Map<String, Value>, ValidationError> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Map::new()),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(ValidationError::InvalidField {
                field,
                reason: "expected a JSON object".to_string(),
            }),
        },
        Some(_) => Err(ValidationError::InvalidField {
            field,
            reason: "expected a JSON object".to_string(),
        }),
    }
}
