//! Clear command implementation
//!
//! Deletes only the documents that earlier import sessions recorded, then the
//! sessions themselves.

use super::{confirm, exit_code_for};
use crate::adapters::database::create_stores;
use crate::config::load_config;
use crate::core::tracker::SessionManager;
use crate::domain::{EntityKind, ImportType};
use clap::Args;

/// Arguments for the clear command
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Entity kind whose imported documents are removed
    #[arg(short, long)]
    pub kind: String,

    /// Only clear sessions of this import type (bulk, manual, seed)
    #[arg(long)]
    pub import_type: Option<String>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl ClearArgs {
    fn filters(&self) -> crate::domain::Result<(EntityKind, Option<ImportType>)> {
        let kind = self.kind.parse::<EntityKind>()?;
        let import_type = self.import_type.as_deref().map(str::parse::<ImportType>).transpose()?;
        Ok((kind, import_type))
    }

    /// Execute the clear command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (kind, import_type) = match self.filters() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Invalid arguments: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        tracing::info!(entity_kind = %kind, import_type = ?import_type, "Starting clear command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let (documents, sessions) = match create_stores(&config).await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to connect to database: {e}");
                return Ok(4);
            }
        };
        let manager = SessionManager::new(documents, sessions);

        let tracked = match manager.imported_ids(kind, import_type).await {
            Ok(ids) => ids.len(),
            Err(e) => {
                eprintln!("Failed to load import sessions: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if !self.yes {
            println!(
                "This will delete {tracked} imported {kind} document(s){}.",
                import_type
                    .map(|t| format!(" from {t} imports"))
                    .unwrap_or_default()
            );
            if !confirm("Proceed?")? {
                println!("Clear cancelled.");
                return Ok(0);
            }
        }

        match manager.clear_imported_data(kind, import_type).await {
            Ok(result) => {
                println!(
                    "🧹 Deleted {} document(s) and {} session(s)",
                    result.documents_deleted, result.sessions_deleted
                );
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Clear failed");
                eprintln!("Clear failed: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_args_filters() {
        let args = ClearArgs {
            kind: "users".to_string(),
            import_type: Some("manual".to_string()),
            yes: true,
        };
        assert_eq!(
            args.filters().unwrap(),
            (EntityKind::Users, Some(ImportType::Manual))
        );
    }

    #[test]
    fn test_clear_args_requires_known_kind() {
        let args = ClearArgs {
            kind: "tickets".to_string(),
            import_type: None,
            yes: true,
        };
        assert!(args.filters().is_err());
    }
}
