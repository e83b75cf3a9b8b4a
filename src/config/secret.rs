//! Secure credential handling using the secrecy crate
//!
//! The Cosmos DB key and the PostgreSQL connection string are held as
//! [`SecretString`]: memory is zeroed on drop, `Debug` output is redacted, and the
//! value is only reachable through `expose_secret()`.
//!
//! ```rust
//! use bulkload::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("primary-key".to_string());
//! assert_eq!(key.expose_secret().as_ref(), "primary-key");
//! assert!(!format!("{key:?}").contains("primary-key"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String payload that can live inside a [`Secret`]
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Parse the secret value into another type (e.g. a driver connection config)
    pub fn parse<F: std::str::FromStr>(&self) -> Result<F, F::Err> {
        self.0.parse()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A zeroizing, redacted string
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("pg-password".to_string());
        assert_eq!(secret.expose_secret(), "pg-password");
        assert!(secret.expose_secret().starts_with("pg-"));
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("cosmos-primary-key".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("cosmos-primary-key"));
    }

    #[test]
    fn test_secret_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Section {
            key: SecretString,
        }

        let section: Section = toml::from_str("key = \"abc123\"").unwrap();
        assert_eq!(section.key.expose_secret(), "abc123");
    }
}
