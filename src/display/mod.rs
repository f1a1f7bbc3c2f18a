//! Terminal display utilities for the CLI.
//!
//! Provides styled tables, spinners and help text.

pub mod help;
pub mod progress;
pub mod tables;
pub mod theme;

pub use help::{create_help_text, format_help_section};
pub use progress::{create_spinner, with_spinner};
pub use tables::{TableBuilder, create_info_table, create_search_table, truncate_title};
pub use theme::{THEME, Theme, Tone};
