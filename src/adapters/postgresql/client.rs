//! PostgreSQL client implementation
//!
//! This module provides the pooled client used by the PostgreSQL stores.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{BulkloadError, Result};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::{NoTls, Row};

/// PostgreSQL client for Bulkload
///
/// Owns a connection pool shared by the document and session stores.
pub struct PostgreSQLClient {
    /// Connection pool
    pool: Pool,

    /// Database name from the connection string
    database_name: String,

    /// Configuration
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid or the pool can't be built.
    pub async fn new(config: PostgreSQLConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config =
            config.connection_string.expose_secret().parse().map_err(|e| {
                BulkloadError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;
        pg_config.ssl_mode(driver_ssl_mode(&config.ssl_mode));

        let database_name = pg_config.get_dbname().unwrap_or("postgres").to_string();

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let manager = if config.ssl_mode == "disable" {
            Manager::from_config(pg_config, NoTls, manager_config)
        } else {
            let connector = tls_connector(&config.ssl_mode)?;
            Manager::from_config(pg_config, MakeTlsConnector::new(connector), manager_config)
        };

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                BulkloadError::Connection(format!("Failed to create connection pool: {e}"))
            })?;

        tracing::debug!(
            database = %database_name,
            ssl_mode = %config.ssl_mode,
            max_connections = config.max_connections,
            "PostgreSQL pool created"
        );

        Ok(Self {
            pool,
            database_name,
            config,
        })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| BulkloadError::Connection(format!("Connection test failed: {e}")))?;

        tracing::info!(database = %self.database_name, "PostgreSQL connection test successful");
        Ok(())
    }

    /// Create tables and indexes if they don't exist
    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.get_connection().await?;

        let migration_sql = include_str!("../../../migrations/001_initial_schema.sql");

        client
            .batch_execute(migration_sql)
            .await
            .map_err(|e| BulkloadError::Database(format!("Failed to execute migration: {e}")))?;

        tracing::debug!("PostgreSQL schema ensured");
        Ok(())
    }

    /// Get a connection from the pool
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| {
            BulkloadError::Connection(format!("Failed to get connection from pool: {e}"))
        })
    }

    /// Execute a query and return rows
    pub async fn query(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;
        self.apply_statement_timeout(&client).await?;

        client
            .query(query, params)
            .await
            .map_err(|e| BulkloadError::Database(format!("Query failed: {e}")))
    }

    /// Execute a statement and return the number of affected rows
    pub async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<u64> {
        let client = self.get_connection().await?;
        self.apply_statement_timeout(&client).await?;

        client
            .execute(statement, params)
            .await
            .map_err(|e| BulkloadError::Database(format!("Statement execution failed: {e}")))
    }

    async fn apply_statement_timeout(&self, client: &deadpool_postgres::Object) -> Result<()> {
        client
            .batch_execute(&format!(
                "SET statement_timeout = {}",
                self.config.statement_timeout_seconds * 1000
            ))
            .await
            .map_err(|e| BulkloadError::Database(format!("Failed to set statement timeout: {e}")))
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

/// Map a libpq-style `sslmode` onto the driver's coarser setting
fn driver_ssl_mode(ssl_mode: &str) -> SslMode {
    match ssl_mode {
        "disable" => SslMode::Disable,
        "allow" | "prefer" => SslMode::Prefer,
        _ => SslMode::Require,
    }
}

/// TLS connector for a non-`disable` ssl mode
///
/// Only `verify-ca` and `verify-full` check the server certificate, and only
/// `verify-full` checks the host name.
fn tls_connector(ssl_mode: &str) -> Result<native_tls::TlsConnector> {
    let verify_cert = matches!(ssl_mode, "verify-ca" | "verify-full");
    let verify_host = ssl_mode == "verify-full";

    native_tls::TlsConnector::builder()
        .danger_accept_invalid_certs(!verify_cert)
        .danger_accept_invalid_hostnames(!verify_host)
        .build()
        .map_err(|e| BulkloadError::Configuration(format!("Failed to build TLS connector: {e}")))
}
