//! User validation

use super::fields::{one_of, required, text};
use crate::domain::{RawRecord, User, UserRole, ValidationError};

/// Validate and normalise a user record; `email` and `fullName` are required
pub fn validate_user(raw: &RawRecord) -> Result<User, ValidationError> {
    Ok(User {
        email: required(raw, "email")?,
        full_name: required(raw, "fullName")?,
        role: one_of(
            raw,
            "role",
            UserRole::ALLOWED,
            UserRole::parse,
            UserRole::default(),
        )?,
        organization: text(raw, "organization"),
        phone: text(raw, "phone"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_valid_user() {
        let user = validate_user(&raw(json!({
            "email": "jo@acme.com",
            "fullName": "Jo Bloggs",
            "role": "admin",
            "organization": "Acme",
            "phone": ""
        })))
        .unwrap();

        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.organization.as_deref(), Some("Acme"));
        assert_eq!(user.phone, None);
    }

    #[test]
    fn test_role_defaults_to_member() {
        let user = validate_user(&raw(json!({"email": "a@b.com", "fullName": "A B"}))).unwrap();
        assert_eq!(user.role, UserRole::Member);
    }

    #[test_case(json!({"fullName": "A B"}), ValidationError::MissingField("email") ; "missing email")]
    #[test_case(json!({"email": "a@b.com"}), ValidationError::MissingField("fullName") ; "missing name")]
    fn test_rejections(input: Value, expected: ValidationError) {
        assert_eq!(validate_user(&raw(input)), Err(expected));
    }

    #[test]
    fn test_unknown_role() {
        let err = validate_user(&raw(json!({
            "email": "a@b.com",
            "fullName": "A B",
            "role": "owner"
        })))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'owner' for field 'role', expected one of: admin, member"
        );
    }
}
