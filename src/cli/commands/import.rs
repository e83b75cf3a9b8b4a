//! Import command implementation
//!
//! This module implements the `import` command, which loads one source file of a
//! single entity kind into the configured store.

use super::{confirm, exit_code_for};
use crate::adapters::database::create_stores;
use crate::config::{load_config, ImportConfig, MAX_BATCH_SIZE};
use crate::core::import::{
    ImportCoordinator, ImportProgress, ImportReport, ImportRequest, ImportStats,
};
use crate::core::source::SourceFormat;
use crate::core::tracker::SessionStatus;
use crate::domain::{BulkloadError, EntityKind, ImportType};
use clap::Args;
use std::path::PathBuf;
use tokio::sync::{mpsc, watch};

const ERROR_SAMPLE_SIZE: usize = 10;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Entity kind (organizations, users, configurations, activity_logs)
    #[arg(short, long)]
    pub kind: String,

    /// Source file to import
    #[arg(short, long)]
    pub file: PathBuf,

    /// Source format (json or csv); inferred from the extension when omitted
    #[arg(long)]
    pub format: Option<String>,

    /// Override the configured batch size
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Import type recorded on the session (bulk, manual, seed)
    #[arg(long)]
    pub import_type: Option<String>,

    /// Delete every existing document of this kind before importing
    #[arg(long)]
    pub clear_existing: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl ImportArgs {
    /// Parse the flags into a request on top of the configured defaults
    fn build_request(&self, config: &ImportConfig) -> crate::domain::Result<ImportRequest> {
        let kind: EntityKind = self.kind.parse()?;
        let mut request = ImportRequest::from_config(kind, self.file.clone(), config);

        if let Some(format) = &self.format {
            request.format = Some(format.parse::<SourceFormat>()?);
        }
        if let Some(import_type) = &self.import_type {
            request.import_type = import_type.parse::<ImportType>()?;
        }
        if let Some(batch_size) = self.batch_size {
            if !(1..=MAX_BATCH_SIZE).contains(&batch_size) {
                return Err(BulkloadError::Configuration(format!(
                    "--batch-size must be between 1 and {MAX_BATCH_SIZE}, got {batch_size}"
                )));
            }
            tracing::info!(batch_size, "Overriding batch size from CLI");
            request.batch_size = batch_size;
        }
        request.clear_existing = self.clear_existing;

        Ok(request)
    }

    /// Execute the import command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting import command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let request = match self.build_request(&config.import) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Invalid arguments: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if request.clear_existing && !self.yes {
            println!("Import Configuration:");
            println!("  Entity kind: {}", request.entity_kind);
            println!("  File: {}", request.file_path.display());
            println!("  Import type: {}", request.import_type);
            println!();
            println!(
                "⚠️  --clear-existing deletes EVERY {} document, including ones not created by Bulkload.",
                request.entity_kind
            );
            if !confirm("Proceed with import?")? {
                println!("Import cancelled.");
                return Ok(0);
            }
        }

        let (documents, sessions) = match create_stores(&config).await {
            Ok(stores) => stores,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create stores");
                eprintln!("Failed to connect to database: {e}");
                return Ok(4);
            }
        };

        let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<ImportProgress>();
        let printer = tokio::spawn(async move {
            while let Some(progress) = progress_rx.recv().await {
                println!(
                    "  Batch {}/{}: {}/{} records ({:.1}%)",
                    progress.batch,
                    progress.total_batches,
                    progress.processed,
                    progress.total,
                    progress.percent
                );
            }
        });

        let coordinator = ImportCoordinator::new(documents, sessions)
            .with_shutdown_signal(shutdown_signal)
            .with_progress(progress_tx);

        println!(
            "🚀 Importing {} from {}...",
            request.entity_kind,
            request.file_path.display()
        );
        println!();

        let outcome = coordinator.run(request).await;
        // Closes the progress channel so the printer drains and exits
        drop(coordinator);
        let _ = printer.await;

        let report = match outcome {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "Import failed");
                eprintln!("Import failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_report(&report);
        Ok(report_exit_code(&report))
    }
}

fn print_report(report: &ImportReport) {
    let stats = &report.stats;

    println!();
    println!("📊 Import Summary:");
    println!("  Session: {}", report.session.session_id);
    println!("  Total Records: {}", stats.total_records);
    println!("  Successful: {}", stats.successful_inserts);
    println!("  Failed: {}", stats.failed_inserts);
    println!("  Skipped (invalid): {}", stats.skipped_records);
    println!(
        "  Duration: {:.2}s",
        stats.duration().num_milliseconds() as f64 / 1000.0
    );
    println!("  Success Rate: {:.2}%", stats.success_rate());
    println!("  Status: {}", report.status());
    println!();

    let samples = error_sample_lines(stats);
    if !samples.is_empty() {
        println!("⚠️  Errors encountered:");
        for line in samples {
            println!("{line}");
        }
        println!();
    }
}

/// First errors of a run, plus a note for every error not shown
///
/// The note also counts errors past `max_recorded_errors` that were never kept.
fn error_sample_lines(stats: &ImportStats) -> Vec<String> {
    let mut lines: Vec<String> = stats
        .errors
        .iter()
        .take(ERROR_SAMPLE_SIZE)
        .map(|error| format!("  - Record {}: {}", error.record_index, error.message))
        .collect();

    let hidden = stats.error_count().saturating_sub(lines.len());
    if hidden > 0 {
        lines.push(format!("  ... and {hidden} more errors"));
    }
    lines
}

fn report_exit_code(report: &ImportReport) -> i32 {
    if report.stats.interrupted {
        println!("⚠️  Import interrupted gracefully. Session saved as {}.", report.status());
        tracing::info!("Import interrupted by user signal");
        return 130;
    }

    match report.status() {
        SessionStatus::Completed => {
            println!("✅ Import completed successfully!");
            0
        }
        SessionStatus::Partial | SessionStatus::Failed => {
            println!("⚠️  Import completed with failures");
            1
        }
    }
}
