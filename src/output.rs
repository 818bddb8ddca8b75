//! # Output Formatting
//!
//! Colored status lines for the `check` command.

use owo_colors::OwoColorize;

/// Print a success message
pub fn print_success(message: &str) {
  println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
  eprintln!("{} {}", "✗".red().bold(), message);
}
