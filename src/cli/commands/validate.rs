//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Bulkload configuration file.

use crate::config::load_config;
use crate::config::schema::{BulkloadConfig, DatabaseTarget};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                print_summary(&config);
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}

fn print_summary(config: &BulkloadConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);

    match config.database_target {
        DatabaseTarget::CosmosDB => {
            if let Some(ref cosmos_config) = config.cosmosdb {
                println!("  Database Target: CosmosDB");
                println!("  Cosmos DB Endpoint: {}", cosmos_config.endpoint);
                println!("  Cosmos DB Database: {}", cosmos_config.database_name);
                println!("  Session Container: {}", cosmos_config.session_container);
            }
        }
        DatabaseTarget::PostgreSQL => {
            if let Some(ref pg_config) = config.postgresql {
                use secrecy::ExposeSecret;
                println!("  Database Target: PostgreSQL");
                println!(
                    "  PostgreSQL Connection: {}",
                    redact_credentials(pg_config.connection_string.expose_secret().as_ref())
                );
                println!("  Max Connections: {}", pg_config.max_connections);
                println!("  SSL Mode: {}", pg_config.ssl_mode);
            }
        }
        DatabaseTarget::Memory => {
            println!("  Database Target: Memory (nothing is persisted)");
            println!("  Bulk Mode: {:?}", config.memory.bulk_mode);
        }
    }

    println!("  Batch Size: {}", config.import.batch_size);
    println!("  Bulk Timeout: {}s", config.import.bulk_timeout_secs);
    println!("  Default Import Type: {}", config.import.default_import_type);
    println!("  Checkpoint Sessions: {}", config.import.checkpoint_sessions);
    println!();
}

/// Keep only the host part of a connection URL
fn redact_credentials(connection_string: &str) -> &str {
    connection_string.split('@').next_back().unwrap_or("***")
}
