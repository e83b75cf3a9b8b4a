//! Configuration management for Bulkload.
//!
//! Bulkload reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `BULKLOAD_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! database_target = "postgresql"
//!
//! [application]
//! log_level = "info"
//!
//! [import]
//! batch_size = 1000
//! bulk_timeout_secs = 30
//!
//! [postgresql]
//! connection_string = "${BULKLOAD_PG_URL}"
//! ssl_mode = "require"
//! ```
//!
//! ```rust,no_run
//! use bulkload::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("bulkload.toml")?;
//! println!("Batch size: {}", config.import.batch_size);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, BulkloadConfig, CosmosDbConfig, DatabaseTarget, ImportConfig,
    LoggingConfig, MemoryBulkMode, MemoryConfig, PostgreSQLConfig, MAX_BATCH_SIZE,
};
pub use secret::{secret_string, SecretString, SecretValue};
