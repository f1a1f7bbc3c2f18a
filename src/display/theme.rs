//! Colors and status markers for terminal output.
//!
//! Color is dropped when `NO_COLOR` is set or when the stream the text is
//! written to is not a terminal, so piped output stays plain.

use console::Style;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::sync::LazyLock;

pub static THEME: LazyLock<Theme> = LazyLock::new(Theme::default);

/// Kind of a one-line status message.
///
/// Successes go to stdout; warnings and errors go to stderr, and color is
/// decided for the stream each one is printed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
}

impl Tone {
    fn marker(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✗",
        }
    }

    fn on_terminal(self) -> bool {
        match self {
            Self::Success => std::io::stdout().is_terminal(),
            Self::Warning | Self::Error => std::io::stderr().is_terminal(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub header: Style,
    /// Secondary text such as recovery hints
    pub dim: Style,
    pub path: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            success: Style::new().green().bright(),
            error: Style::new().red().bright(),
            warning: Style::new().yellow().bright(),
            header: Style::new().cyan().bold(),
            dim: Style::new().dim(),
            path: Style::new().magenta(),
        }
    }
}

impl Theme {
    /// `text` prefixed with the marker for `tone`.
    pub fn status(&self, tone: Tone, text: &str) -> String {
        self.paint(tone, text, !Self::no_color() && tone.on_terminal())
    }

    fn paint(&self, tone: Tone, text: &str, colored: bool) -> String {
        let marker = tone.marker();
        if !colored {
            return format!("{marker} {text}");
        }
        match tone {
            Tone::Success => format!("{} {}", marker.green(), self.success.apply_to(text)),
            Tone::Warning => format!("{} {}", marker.yellow(), self.warning.apply_to(text)),
            Tone::Error => format!("{} {}", marker.red(), self.error.apply_to(text)),
        }
    }

    pub fn success_with_icon(&self, text: &str) -> String {
        self.status(Tone::Success, text)
    }

    pub fn warning_with_icon(&self, text: &str) -> String {
        self.status(Tone::Warning, text)
    }

    pub fn error_with_icon(&self, text: &str) -> String {
        self.status(Tone::Error, text)
    }

    /// Heading underlined with `=` to its own width.
    pub fn heading(&self, text: &str) -> String {
        let rule = "=".repeat(text.chars().count());
        format!("{}\n{rule}", self.apply(&self.header, text))
    }

    /// Whether stdout output should be styled.
    pub fn colors_enabled() -> bool {
        !Self::no_color() && std::io::stdout().is_terminal()
    }

    /// Style `text` for stdout, or return it unchanged when colors are off.
    pub fn apply<T: std::fmt::Display>(&self, style: &Style, text: T) -> String {
        if Self::colors_enabled() {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn no_color() -> bool {
        std::env::var_os("NO_COLOR").is_some()
    }
}
