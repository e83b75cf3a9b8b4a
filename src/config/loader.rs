//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BulkloadConfig;
use super::secret::secret_string;
use crate::domain::errors::BulkloadError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into BulkloadConfig
/// 4. Applies environment variable overrides (BULKLOAD_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a [`BulkloadError::Configuration`] if the file is missing or unreadable,
/// a referenced variable is unset, the TOML doesn't parse, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use bulkload::config::loader::load_config;
///
/// let config = load_config("bulkload.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BulkloadConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BulkloadError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BulkloadError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses, overrides and validates configuration from TOML text
pub fn parse_config(contents: &str) -> Result<BulkloadConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: BulkloadConfig = toml::from_str(&contents)
        .map_err(|e| BulkloadError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        BulkloadError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every missing variable is reported at once.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| BulkloadError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BulkloadError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the BULKLOAD_* prefix
///
/// Variables follow the pattern `BULKLOAD_<SECTION>_<KEY>`, for example
/// `BULKLOAD_IMPORT_BATCH_SIZE` or `BULKLOAD_POSTGRESQL_CONNECTION_STRING`.
fn apply_env_overrides(config: &mut BulkloadConfig) -> Result<()> {
    if let Ok(val) = std::env::var("BULKLOAD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("BULKLOAD_DATABASE_TARGET") {
        config.database_target = toml::Value::String(val.to_lowercase())
            .try_into()
            .map_err(|e| {
                BulkloadError::Configuration(format!("Invalid BULKLOAD_DATABASE_TARGET: {e}"))
            })?;
    }

    // Import overrides
    if let Ok(val) = std::env::var("BULKLOAD_IMPORT_BATCH_SIZE") {
        if let Ok(size) = val.parse() {
            config.import.batch_size = size;
        }
    }
    if let Ok(val) = std::env::var("BULKLOAD_IMPORT_BULK_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse() {
            config.import.bulk_timeout_secs = secs;
        }
    }
    if let Ok(val) = std::env::var("BULKLOAD_IMPORT_MAX_RECORDED_ERRORS") {
        if let Ok(max) = val.parse() {
            config.import.max_recorded_errors = max;
        }
    }
    if let Ok(val) = std::env::var("BULKLOAD_IMPORT_CHECKPOINT_SESSIONS") {
        config.import.checkpoint_sessions = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("BULKLOAD_IMPORT_DEFAULT_IMPORT_TYPE") {
        config.import.default_import_type = val.parse()?;
    }

    // Cosmos DB overrides (only if Cosmos DB is configured)
    if let Some(ref mut cosmos_config) = config.cosmosdb {
        if let Ok(val) = std::env::var("BULKLOAD_COSMOSDB_ENDPOINT") {
            cosmos_config.endpoint = val;
        }
        if let Ok(val) = std::env::var("BULKLOAD_COSMOSDB_KEY") {
            cosmos_config.key = secret_string(val);
        }
        if let Ok(val) = std::env::var("BULKLOAD_COSMOSDB_DATABASE_NAME") {
            cosmos_config.database_name = val;
        }
        if let Ok(val) = std::env::var("BULKLOAD_COSMOSDB_MAX_CONCURRENCY") {
            if let Ok(concurrency) = val.parse() {
                cosmos_config.max_concurrency = concurrency;
            }
        }
    }

    // PostgreSQL overrides (only if PostgreSQL is configured)
    if let Some(ref mut pg_config) = config.postgresql {
        if let Ok(val) = std::env::var("BULKLOAD_POSTGRESQL_CONNECTION_STRING") {
            pg_config.connection_string = secret_string(val);
        }
        if let Ok(val) = std::env::var("BULKLOAD_POSTGRESQL_MAX_CONNECTIONS") {
            if let Ok(max) = val.parse() {
                pg_config.max_connections = max;
            }
        }
        if let Ok(val) = std::env::var("BULKLOAD_POSTGRESQL_SSL_MODE") {
            pg_config.ssl_mode = val;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("BULKLOAD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("BULKLOAD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("BULKLOAD_LOADER_TEST_VAR", "test_value");
        let input = "key = \"${BULKLOAD_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "key = \"test_value\"\n");
        std::env::remove_var("BULKLOAD_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("BULKLOAD_LOADER_MISSING_A");
        std::env::remove_var("BULKLOAD_LOADER_MISSING_B");
        let input = "a = \"${BULKLOAD_LOADER_MISSING_A}\"\nb = \"${BULKLOAD_LOADER_MISSING_B}\"";
        let err = substitute_env_vars(input).unwrap_err().to_string();
        assert!(err.contains("BULKLOAD_LOADER_MISSING_A"));
        assert!(err.contains("BULKLOAD_LOADER_MISSING_B"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("BULKLOAD_LOADER_COMMENTED");
        let input = "# key = \"${BULKLOAD_LOADER_COMMENTED}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-bulkload.toml");
        assert!(matches!(result, Err(BulkloadError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
database_target = "memory"

[application]
log_level = "debug"

[import]
batch_size = 250
checkpoint_sessions = true
default_import_type = "seed"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.import.batch_size, 250);
        assert!(config.import.checkpoint_sessions);
        assert_eq!(
            config.import.default_import_type,
            crate::domain::ImportType::Seed
        );
    }

    #[test]
    fn test_parse_config_rejects_invalid_batch_size() {
        let err = parse_config("database_target = \"memory\"\n[import]\nbatch_size = 0\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("batch_size"));
    }
}
