//! Query side: embed a question, rank stored documents, present results.

mod engine;
mod result;

pub use engine::SearchEngine;
pub use result::{SearchResult, format_result};
