//! CSV source files
//!
//! Streamed one line at a time. The first non-blank line is the header; every
//! following non-blank line becomes one record of string values.
//!
//! Quoting is deliberately simple: a `"` toggles the in-quotes state and is
//! dropped, and commas inside quotes don't split. Escaped quotes (`""`) are not
//! recognised, so `"say ""hi"""` reads as `say hi`.

use crate::domain::{BulkloadError, RawRecord, Result};
use serde_json::Value;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

const BOM: char = '\u{feff}';

/// Stream records from a CSV file into `on_record`, returning how many were produced
pub async fn read_records<F>(path: &Path, mut on_record: F) -> Result<usize>
where
    F: FnMut(RawRecord),
{
    let file = File::open(path).await.map_err(|e| {
        BulkloadError::Source(format!("Failed to open {}: {}", path.display(), e))
    })?;
    let mut lines = BufReader::new(file).lines();

    let mut header: Option<Vec<String>> = None;
    let mut count = 0usize;
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await.map_err(|e| {
        BulkloadError::Source(format!(
            "Failed to read {} after line {}: {}",
            path.display(),
            line_number,
            e
        ))
    })? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        match &header {
            None => header = Some(parse_header(&line)),
            Some(columns) => {
                on_record(zip_record(columns, split_line(&line)));
                count += 1;
            }
        }
    }

    if header.is_none() {
        return Err(BulkloadError::Source(format!(
            "CSV file {} has no header row",
            path.display()
        )));
    }

    Ok(count)
}

/// Header names, trimmed, with any UTF-8 byte order mark removed
pub fn parse_header(line: &str) -> Vec<String> {
    split_line(line.trim_start_matches(BOM))
}

/// Quote-aware comma split; values are trimmed
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Pair values with header names by position
///
/// Missing trailing values are left absent; surplus values are dropped.
pub fn zip_record(header: &[String], values: Vec<String>) -> RawRecord {
    header
        .iter()
        .zip(values)
        .map(|(name, value)| (name.clone(), Value::String(value)))
        .collect()
}
