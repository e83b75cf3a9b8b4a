//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Bulkload using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Bulkload - Batch record importer
#[derive(Parser, Debug)]
#[command(name = "bulkload")]
#[command(version, about, long_about = None)]
#[command(author = "Bulkload Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "bulkload.toml", env = "BULKLOAD_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BULKLOAD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import records from a JSON or CSV file
    Import(commands::import::ImportArgs),

    /// List recorded import sessions
    Sessions(commands::sessions::SessionsArgs),

    /// Delete the documents created by previous imports
    Clear(commands::clear::ClearArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_import() {
        let cli = Cli::parse_from(["bulkload", "import", "--kind", "users", "--file", "u.csv"]);
        assert_eq!(cli.config, "bulkload.toml");
        assert!(matches!(cli.command, Commands::Import(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["bulkload", "--config", "custom.toml", "sessions"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["bulkload", "--log-level", "debug", "sessions"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["bulkload", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_clear() {
        let cli = Cli::parse_from(["bulkload", "clear", "--kind", "organizations", "--yes"]);
        assert!(matches!(cli.command, Commands::Clear(_)));
    }

    #[test]
    fn test_import_requires_kind_and_file() {
        assert!(Cli::try_parse_from(["bulkload", "import", "--file", "x.json"]).is_err());
        assert!(Cli::try_parse_from(["bulkload", "import", "--kind", "users"]).is_err());
    }
}
