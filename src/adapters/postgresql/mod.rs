//! PostgreSQL database integration
//!
//! Stores imported documents and import sessions in PostgreSQL.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use models::PostgreSQLSession;
