//! Cosmos DB client implementation
//!
//! This module provides the client for interacting with Azure Cosmos DB.

use crate::adapters::cosmosdb::models::PARTITION_KEY_PATH;
use crate::config::CosmosDbConfig;
use crate::domain::{BulkloadError, CosmosDbError, EntityKind, Result};
use azure_core::credentials::Secret;
use azure_data_cosmos::clients::{ContainerClient, DatabaseClient};
use azure_data_cosmos::models::{ContainerProperties, IndexingPolicy, PartitionKeyDefinition};
use azure_data_cosmos::{CosmosClient, CosmosClientOptions, PartitionKey};
use futures::stream::StreamExt;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// Cosmos DB client for Bulkload
///
/// Provides methods for connecting to Azure Cosmos DB, managing containers,
/// and querying documents.
pub struct CosmosDbClient {
    /// Cosmos DB client
    client: CosmosClient,

    /// Database client
    database: DatabaseClient,

    /// Configuration
    config: CosmosDbConfig,
}

impl CosmosDbClient {
    /// Create a new Cosmos DB client
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub async fn new(config: CosmosDbConfig) -> Result<Self> {
        use secrecy::ExposeSecret;

        let key = Secret::new(config.key.expose_secret().as_ref().to_string());
        let options = Some(CosmosClientOptions::default());

        let client = CosmosClient::with_key(&config.endpoint, key, options).map_err(|e| {
            BulkloadError::CosmosDb(CosmosDbError::ConnectionFailed(format!(
                "Failed to create Cosmos client: {e}"
            )))
        })?;

        let database = client.database_client(&config.database_name);

        Ok(Self {
            client,
            database,
            config,
        })
    }

    /// Test the connection to Cosmos DB
    ///
    /// Attempts to read the database to verify connectivity.
    pub async fn test_connection(&self) -> Result<()> {
        self.database.read(None).await.map_err(|e| {
            BulkloadError::CosmosDb(CosmosDbError::ConnectionFailed(format!(
                "Connection test failed: {e}"
            )))
        })?;

        Ok(())
    }

    /// Ensure the database exists, creating it if necessary
    pub async fn ensure_database_exists(&self) -> Result<()> {
        match self.database.read(None).await {
            Ok(_) => Ok(()),
            Err(_) => {
                tracing::info!(database = %self.config.database_name, "Creating database");

                self.client
                    .create_database(&self.config.database_name, None)
                    .await
                    .map_err(|e| {
                        BulkloadError::CosmosDb(CosmosDbError::DatabaseNotFound(format!(
                            "Failed to create database {}: {e}",
                            self.config.database_name
                        )))
                    })?;
                Ok(())
            }
        }
    }

    /// Ensure a container exists, creating it with the `/entityKind` partition key
    async fn ensure_container(&self, container_name: &str) -> Result<()> {
        let container = self.database.container_client(container_name);

        match container.read(None).await {
            Ok(_) => {
                tracing::debug!(container = %container_name, "Container already exists");
                Ok(())
            }
            Err(_) => {
                tracing::info!(container = %container_name, "Creating container");

                let partition_key_def = PartitionKeyDefinition {
                    paths: vec![PARTITION_KEY_PATH.to_string()],
                    kind: azure_data_cosmos::models::PartitionKeyKind::Hash,
                    version: None,
                };

                let properties = ContainerProperties {
                    id: Cow::Owned(container_name.to_string()),
                    partition_key: partition_key_def,
                    indexing_policy: Some(IndexingPolicy::default()),
                    ..Default::default()
                };

                self.database
                    .create_container(properties, None)
                    .await
                    .map_err(|e| {
                        BulkloadError::CosmosDb(CosmosDbError::ContainerCreationFailed(format!(
                            "Failed to create container {container_name}: {e}"
                        )))
                    })?;

                tracing::info!(container = %container_name, "Container created successfully");
                Ok(())
            }
        }
    }

    /// Ensure the data container for an entity kind exists
    ///
    /// Container name format: `{prefix}_{kind}`
    pub async fn ensure_data_container_exists(&self, kind: EntityKind) -> Result<()> {
        self.ensure_database_exists().await?;
        self.ensure_container(&self.data_container_name(kind)).await
    }

    /// Ensure the session container exists
    pub async fn ensure_session_container_exists(&self) -> Result<()> {
        self.ensure_database_exists().await?;
        self.ensure_container(&self.config.session_container).await
    }

    pub fn data_container_name(&self, kind: EntityKind) -> String {
        data_container_name(&self.config.data_container_prefix, kind)
    }

    /// Get a container client for an entity kind
    pub fn data_container(&self, kind: EntityKind) -> ContainerClient {
        self.database
            .container_client(&self.data_container_name(kind))
    }

    /// Get the session container client
    pub fn session_container(&self) -> ContainerClient {
        self.database
            .container_client(&self.config.session_container)
    }

    /// Run a query within one partition and collect every result
    pub async fn query_partition<T>(
        &self,
        container: &ContainerClient,
        query: &str,
        kind: EntityKind,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let partition_key = PartitionKey::from(kind.as_str().to_string());

        let mut pager = container
            .query_items::<T>(query.to_string(), partition_key, None)
            .map_err(|e| {
                BulkloadError::CosmosDb(CosmosDbError::QueryFailed(format!(
                    "Failed to create query: {e}"
                )))
            })?;

        let mut items = Vec::new();
        while let Some(item) = pager.next().await {
            let item = item.map_err(|e| {
                BulkloadError::CosmosDb(CosmosDbError::QueryFailed(format!(
                    "Failed to read query results: {e}"
                )))
            })?;
            items.push(item);
        }
        Ok(items)
    }

    /// Maximum concurrent item writes within one bulk insert
    pub fn max_concurrency(&self) -> usize {
        self.config.max_concurrency
    }

    /// Get the database name
    pub fn database_name(&self) -> &str {
        &self.config.database_name
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

/// Name of the data container for a kind
pub fn data_container_name(prefix: &str, kind: EntityKind) -> String {
    format!("{prefix}_{}", kind.as_str())
}

/// Whether a Cosmos error message describes a missing resource
pub fn is_not_found(message: &str) -> bool {
    message.contains("404") || message.contains("NotFound")
}

/// Whether a Cosmos error message describes an id conflict
pub fn is_conflict(message: &str) -> bool {
    message.contains("409") || message.contains("Conflict")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_container_name() {
        assert_eq!(
            data_container_name("bulkload", EntityKind::ActivityLogs),
            "bulkload_activity_logs"
        );
        assert_eq!(
            data_container_name("crm", EntityKind::Organizations),
            "crm_organizations"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(is_not_found("HTTP 404 NotFound: resource missing"));
        assert!(is_conflict("status 409: Conflict, id already exists"));
        assert!(!is_conflict("status 429: TooManyRequests"));
    }
}
