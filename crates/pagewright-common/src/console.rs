//! Colored terminal output for pass summaries.
//!
//! Library crates never print. Their reports implement `Display` as a one-line
//! summary, and the CLI routes those lines through here tagged with the pass
//! name.

use owo_colors::OwoColorize;

/// Print a completed unit of work (green pass tag).
///
/// # Example
/// ```ignore
/// summary("remove", "section-abc (1,204 bytes)");
/// ```
pub fn summary(pass: &str, message: &str) {
    println!("{} {message}", format!("[{pass}]").green());
}

/// Print a detail line belonging to the previous summary.
pub fn detail(message: &str) {
    println!("  {}", message.dimmed());
}

/// Warn about a recoverable condition such as a missing marker or a
/// zero-count rename.
pub fn warn(pass: &str, message: &str) {
    eprintln!("{}", format!("[{pass}] ⚠ {message}").yellow());
}

/// Report a fatal error for a pass.
pub fn error(pass: &str, message: &str) {
    eprintln!("{}", format!("[{pass}] ✗ {message}").red());
}
