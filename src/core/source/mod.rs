//! Source reader
//!
//! Turns a JSON or CSV file into an ordered sequence of [`RawRecord`]s. Any failure
//! here is a [`BulkloadError::Source`] and aborts the run.

pub mod csv;
pub mod json;

use crate::domain::{BulkloadError, EntityKind, RawRecord, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported source file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Json,
    Csv,
}

impl SourceFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Some(SourceFormat::Json),
            Some("csv") => Some(SourceFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Json => f.write_str("json"),
            SourceFormat::Csv => f.write_str("csv"),
        }
    }
}

impl FromStr for SourceFormat {
    type Err = BulkloadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(SourceFormat::Json),
            "csv" => Ok(SourceFormat::Csv),
            other => Err(BulkloadError::Configuration(format!(
                "Unknown source format '{other}'. Must be one of: json, csv"
            ))),
        }
    }
}

/// Resolve an explicit format, falling back to the file extension
pub fn resolve_format(path: &Path, format: Option<SourceFormat>) -> Result<SourceFormat> {
    format.or_else(|| SourceFormat::from_path(path)).ok_or_else(|| {
        BulkloadError::Source(format!(
            "Cannot infer source format from {}; pass --format json or --format csv",
            path.display()
        ))
    })
}

/// Load every record from a source file
///
/// # Errors
///
/// Returns a [`BulkloadError::Source`] if the file is missing, unreadable, or not
/// shaped as expected for `kind`.
pub async fn load(path: &Path, format: SourceFormat, kind: EntityKind) -> Result<Vec<RawRecord>> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(BulkloadError::Source(format!(
            "Source file not found: {}",
            path.display()
        )));
    }

    let records = match format {
        SourceFormat::Json => json::read_records(path, kind).await?,
        SourceFormat::Csv => {
            let mut records = Vec::new();
            csv::read_records(path, |record| records.push(record)).await?;
            records
        }
    };

    tracing::info!(
        file = %path.display(),
        format = %format,
        records = records.len(),
        "Source file loaded"
    );

    Ok(records)
}
