//! Sessions command implementation
//!
//! Lists persisted import sessions, newest first.

use super::exit_code_for;
use crate::adapters::database::create_stores;
use crate::config::load_config;
use crate::core::tracker::{ImportSession, SessionManager, SessionStatus};
use crate::domain::{EntityKind, ImportType};
use clap::Args;

/// Arguments for the sessions command
#[derive(Args, Debug)]
pub struct SessionsArgs {
    /// Filter by entity kind
    #[arg(long)]
    pub kind: Option<String>,

    /// Filter by import type (bulk, manual, seed)
    #[arg(long)]
    pub import_type: Option<String>,
}

impl SessionsArgs {
    fn filters(&self) -> crate::domain::Result<(Option<EntityKind>, Option<ImportType>)> {
        let kind = self.kind.as_deref().map(str::parse::<EntityKind>).transpose()?;
        let import_type = self.import_type.as_deref().map(str::parse::<ImportType>).transpose()?;
        Ok((kind, import_type))
    }

    /// Execute the sessions command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Listing import sessions");

        let (kind, import_type) = match self.filters() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Invalid arguments: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let (documents, sessions) = match create_stores(&config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to database");
                println!("   Error: {e}");
                return Ok(4);
            }
        };

        let manager = SessionManager::new(documents, sessions);
        let sessions: Vec<ImportSession> = match manager.list_sessions(kind).await {
            Ok(s) => s
                .into_iter()
                .filter(|s| s.matches(kind, import_type))
                .collect(),
            Err(e) => {
                println!("❌ Failed to load import sessions");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if sessions.is_empty() {
            println!("No import sessions found.");
            println!("Run 'bulkload import' to start importing data.");
            return Ok(0);
        }

        println!("Found {} session(s):", sessions.len());
        println!();
        println!(
            "{:<58} {:<15} {:<8} {:<12} {:>10} {:<20}",
            "Session ID", "Kind", "Type", "Status", "Records", "Imported At"
        );
        println!("{}", "-".repeat(128));

        for session in &sessions {
            println!(
                "{:<58} {:<15} {:<8} {:<12} {:>10} {:<20}",
                session.session_id.as_str(),
                session.entity_kind.as_str(),
                session.import_type.as_str(),
                status_label(session.status),
                session.records_imported,
                session.import_date.format("%Y-%m-%d %H:%M:%S")
            );
        }

        println!();
        Ok(0)
    }
}

fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Completed => "✅ completed",
        SessionStatus::Partial => "⚠️  partial",
        SessionStatus::Failed => "❌ failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_args_without_filters() {
        let args = SessionsArgs {
            kind: None,
            import_type: None,
        };
        assert_eq!(args.filters().unwrap(), (None, None));
    }

    #[test]
    fn test_sessions_args_with_filters() {
        let args = SessionsArgs {
            kind: Some("activity-logs".to_string()),
            import_type: Some("seed".to_string()),
        };
        assert_eq!(
            args.filters().unwrap(),
            (Some(EntityKind::ActivityLogs), Some(ImportType::Seed))
        );
    }

    #[test]
    fn test_sessions_args_rejects_unknown_type() {
        let args = SessionsArgs {
            kind: None,
            import_type: Some("nightly".to_string()),
        };
        assert!(args.filters().is_err());
    }
}
