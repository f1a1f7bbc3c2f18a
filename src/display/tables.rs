//! Table formatting utilities for structured output.

use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use crate::search::SearchResult;
use crate::storage::IndexInfo;

/// Longest title shown in a summary row before it is cut.
const TITLE_WIDTH: usize = 60;

/// Builder for creating formatted tables.
pub struct TableBuilder {
    table: Table,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    /// Create a new table builder.
    pub fn new() -> Self {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.apply_modifier(UTF8_ROUND_CORNERS);
        Self { table }
    }

    /// Set the table headers.
    pub fn set_headers(mut self, headers: Vec<&str>) -> Self {
        let header_cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect();
        self.table.set_header(header_cells);
        self
    }

    /// Add a row to the table.
    pub fn add_row(mut self, row: Vec<Cell>) -> Self {
        self.table.add_row(row);
        self
    }

    /// Build and return the formatted table.
    pub fn build(self) -> String {
        self.table.to_string()
    }
}

/// Cut `title` to 60 characters, marking the cut with `...`.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= TITLE_WIDTH {
        title.to_string()
    } else {
        let cut: String = title.chars().take(TITLE_WIDTH).collect();
        format!("{cut}...")
    }
}

/// Ranked score summary shown before the detailed results.
pub fn create_search_table(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .fold(
            TableBuilder::new().set_headers(vec!["#", "Score", "Title"]),
            |table, (rank, result)| {
                table.add_row(vec![
                    Cell::new(rank + 1).set_alignment(CellAlignment::Right),
                    Cell::new(format!("{:.4}", result.score.get())),
                    Cell::new(truncate_title(&result.metadata.title)),
                ])
            },
        )
        .build()
}

/// Key facts about a persisted index.
pub fn create_info_table(info: &IndexInfo) -> String {
    let unknown = || "unknown".to_string();
    TableBuilder::new()
        .set_headers(vec!["Property", "Value"])
        .add_row(vec![
            Cell::new("Location"),
            Cell::new(info.path.display()),
        ])
        .add_row(vec![Cell::new("Documents"), Cell::new(info.documents)])
        .add_row(vec![Cell::new("Dimension"), Cell::new(info.dimension)])
        .add_row(vec![
            Cell::new("Model"),
            Cell::new(info.model.clone().unwrap_or_else(unknown)),
        ])
        .add_row(vec![
            Cell::new("Built at"),
            Cell::new(info.built_at.clone().unwrap_or_else(unknown)),
        ])
        .build()
}
