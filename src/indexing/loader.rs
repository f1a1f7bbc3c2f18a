//! Loading paper records from extraction output.
//!
//! Input is a JSON object with a `top_papers` list. Entries are validated
//! one by one: a malformed entry is reported and skipped, and the load as a
//! whole only fails when no entry survives.

use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::error::{IndexError, IndexResult};
use crate::types::Record;

/// Key of the record list in the input object.
pub const RECORDS_KEY: &str = "top_papers";

/// An input entry that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    /// Zero-based position in the input list
    pub position: usize,
    /// Title of the entry, when it had a readable one
    pub title: Option<String>,
    pub reason: String,
}

/// Records accepted from an input file, plus what was skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub records: Vec<Record>,
    pub failures: Vec<RecordFailure>,
}

impl LoadReport {
    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

/// Read and validate the records in the file at `path`.
pub fn load_records(path: &Path) -> IndexResult<LoadReport> {
    let json = std::fs::read_to_string(path).map_err(|source| IndexError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let report = parse_records(&json)?;
    tracing::info!(
        "loaded {} of {} records from {}",
        report.records.len(),
        report.total(),
        path.display()
    );
    Ok(report)
}

/// Validate the records in a JSON document.
///
/// Fails with `Schema` when the document is not an object with a
/// `top_papers` list, or when every entry in a non-empty list is invalid.
pub fn parse_records(json: &str) -> IndexResult<LoadReport> {
    let root: Value = serde_json::from_str(json).map_err(|e| IndexError::Schema {
        reason: format!("input is not valid JSON: {e}"),
    })?;

    let entries = root
        .get(RECORDS_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| IndexError::Schema {
            reason: format!("input must be an object with a '{RECORDS_KEY}' list"),
        })?;

    let mut report = LoadReport::default();
    for (position, entry) in entries.iter().enumerate() {
        match parse_entry(entry) {
            Ok(record) => report.records.push(record),
            Err(reason) => {
                let title = entry
                    .get("title")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                tracing::warn!("skipping record {position}: {reason}");
                report.failures.push(RecordFailure {
                    position,
                    title,
                    reason,
                });
            }
        }
    }

    if report.records.is_empty() && !report.failures.is_empty() {
        let first = &report.failures[0];
        return Err(IndexError::Schema {
            reason: format!(
                "all {} records are invalid (first: entry {}: {})",
                report.failures.len(),
                first.position,
                first.reason
            ),
        });
    }

    Ok(report)
}

fn parse_entry(entry: &Value) -> Result<Record, String> {
    if !entry.is_object() {
        return Err("entry is not an object".to_string());
    }
    let record: Record = serde_json::from_value(entry.clone()).map_err(|e| e.to_string())?;
    record.validate().map_err(str::to_string)?;
    Ok(record)
}
