//! Process-level output concerns for the CLI.
//!
//! This module maps library errors onto stable exit codes so scripts can
//! tell a missing index from a corrupt one without parsing messages.

pub mod exit_code;

pub use exit_code::ExitCode;
