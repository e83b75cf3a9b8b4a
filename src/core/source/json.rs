//! JSON source files
//!
//! Read eagerly. Accepts a top-level array, or an object exposing the array under
//! one of the entity kind's wrapper keys.

use crate::domain::{BulkloadError, EntityKind, RawRecord, Result};
use serde_json::Value;
use std::path::Path;

/// Read and parse a whole JSON source file
pub async fn read_records(path: &Path, kind: EntityKind) -> Result<Vec<RawRecord>> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        BulkloadError::Source(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_records(&contents, kind)
}

/// Parse JSON text into raw records
pub fn parse_records(contents: &str, kind: EntityKind) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|e| BulkloadError::Source(format!("Invalid JSON: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => kind
            .json_keys()
            .iter()
            .find_map(|key| match object.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                BulkloadError::Source(format!(
                    "JSON object has no array under {}",
                    kind.json_keys()
                        .iter()
                        .map(|k| format!("'{k}'"))
                        .collect::<Vec<_>>()
                        .join(" or ")
                ))
            })?,
        other => {
            return Err(BulkloadError::Source(format!(
                "Expected a JSON array or object at top level, found {}",
                json_type_name(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(BulkloadError::Source(format!(
                "Element {index} is a JSON {}, expected an object",
                json_type_name(&other)
            ))),
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_array() {
        let records = parse_records(
            r#"[{"name": "Acme", "seats": 5}, {"name": "Globex"}]"#,
            EntityKind::Organizations,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("seats"), Some(&json!(5)));
    }

    #[test]
    fn test_wrapped_array() {
        let records = parse_records(
            r#"{"exportedAt": "2025-01-01", "activityLogs": [{"userId": "u1"}]}"#,
            EntityKind::ActivityLogs,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_wrong_wrapper_key() {
        let err = parse_records(r#"{"users": []}"#, EntityKind::Organizations).unwrap_err();
        assert!(matches!(err, BulkloadError::Source(_)));
        assert!(err.to_string().contains("'organizations'"));
    }

    #[test]
    fn test_scalar_top_level_rejected() {
        assert!(parse_records("42", EntityKind::Users).is_err());
        assert!(parse_records("not json", EntityKind::Users).is_err());
    }

    #[test]
    fn test_non_object_element_rejected() {
        let err = parse_records(r#"[{"email": "a@b.com"}, 7]"#, EntityKind::Users).unwrap_err();
        assert!(err.to_string().contains("Element 1"));
    }

    #[test]
    fn test_field_order_preserved() {
        let records =
            parse_records(r#"[{"zeta": 1, "alpha": 2}]"#, EntityKind::Configurations).unwrap();
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }
}
