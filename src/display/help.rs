//! Help text shown after the generated clap usage.

use crate::display::theme::Theme;
use console::style;

/// Format help text with consistent styling
pub fn format_help_section(title: &str, content: &str, indent: bool) -> String {
    let mut output = String::new();

    if !Theme::colors_enabled() {
        output.push_str(&format!("{title}\n"));
    } else {
        output.push_str(&format!("{}\n", style(title).cyan().bold()));
    }

    for line in content.lines() {
        if line.trim().is_empty() {
            output.push('\n');
        } else if indent && !line.starts_with("    ") {
            output.push_str(&format!("    {line}\n"));
        } else {
            output.push_str(&format!("{line}\n"));
        }
    }

    output
}

/// Create styled help text for the CLI
pub fn create_help_text() -> String {
    let mut help = String::new();

    let quick_start = r#"$ paperdex init                        # Write .paperdex/settings.toml
$ paperdex index research_papers.json  # Embed and persist the papers
$ paperdex search "prompt engineering"  # Ask a question"#;

    help.push_str(&format_help_section("QUICK START", quick_start, true));
    help.push('\n');

    let examples = r#"# Build into a custom directory with a spinner
$ paperdex index data/research_papers.json --output data/index --progress

# Five results as JSON, for scripts
$ paperdex search "LLM evaluation" --limit 5 --json

# What is in the index and which model built it
$ paperdex info"#;

    help.push_str(&format_help_section("EXAMPLES", examples, true));

    help
}
