//! Canonical text rendering of a record.
//!
//! The rendering is what gets embedded, so its field order is part of the
//! index format: changing it requires rebuilding existing indexes.

use crate::types::Record;

/// Render `record` as the text that is embedded and stored.
///
/// Fields appear in a fixed order: title, authors, year and month,
/// technique, technique description (only when present) and summary.
pub fn render_document(record: &Record) -> String {
    let mut text = format!(
        "Title: {}\nAuthors: {}\nYear: {}, Month: {}\nTechnique: {}\n",
        record.title,
        record.authors_display(),
        record.year,
        record.month,
        record.technique_type
    );
    if !record.technique_description.is_empty() {
        text.push_str(&format!(
            "Technique Description: {}\n",
            record.technique_description
        ));
    }
    text.push_str(&format!("Summary: {}", record.summary));
    text
}
