//! Azure Cosmos DB integration
//!
//! Stores each entity kind in its own container and import sessions in a
//! dedicated session container.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::CosmosDbAdapter;
pub use client::CosmosDbClient;
pub use models::CosmosSession;
