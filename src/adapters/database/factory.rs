//! Storage factory
//!
//! Builds the document and session stores for the configured `database_target`
//! from one underlying client so both share a connection pool.

use crate::adapters::cosmosdb::adapter::CosmosDbAdapter;
use crate::adapters::cosmosdb::client::CosmosDbClient;
use crate::adapters::database::traits::{DocumentStore, SessionStore};
use crate::adapters::memory::MemoryStore;
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::{BulkloadConfig, DatabaseTarget};
use crate::domain::{BulkloadError, Result};
use std::sync::Arc;

/// Create document and session stores for the configured target
///
/// # Errors
///
/// Returns an error if the target's section is missing or the client can't connect.
pub async fn create_stores(
    config: &BulkloadConfig,
) -> Result<(Arc<dyn DocumentStore>, Arc<dyn SessionStore>)> {
    match config.database_target {
        DatabaseTarget::CosmosDB => {
            let cosmos_config = config.cosmosdb.as_ref().ok_or_else(|| {
                BulkloadError::Configuration(
                    "cosmosdb configuration is required when database_target = 'cosmosdb'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating Cosmos DB stores");
            let client = Arc::new(CosmosDbClient::new(cosmos_config.clone()).await?);
            let adapter = Arc::new(CosmosDbAdapter::new(client));

            Ok((
                adapter.clone() as Arc<dyn DocumentStore>,
                adapter as Arc<dyn SessionStore>,
            ))
        }
        DatabaseTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                BulkloadError::Configuration(
                    "postgresql configuration is required when database_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL stores");
            let client = Arc::new(PostgreSQLClient::new(pg_config.clone()).await?);
            let adapter = Arc::new(PostgreSQLAdapter::new(client));

            Ok((
                adapter.clone() as Arc<dyn DocumentStore>,
                adapter as Arc<dyn SessionStore>,
            ))
        }
        DatabaseTarget::Memory => {
            tracing::info!(
                bulk_mode = ?config.memory.bulk_mode,
                "Creating in-memory stores; nothing will outlive this process"
            );
            let store = Arc::new(MemoryStore::new(config.memory.bulk_mode));

            Ok((
                store.clone() as Arc<dyn DocumentStore>,
                store as Arc<dyn SessionStore>,
            ))
        }
    }
}
