//! Output formatting shared by every subcommand.
//!
//! Red for errors, green for success, white for plain information. Every helper prints
//! a blank line before its message so consecutive outputs stay readable.

use colored::*;

/// Prints `✕ Error: <message>` surrounded by blank lines.
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Prints `✓ <message>` after a blank line.
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Prints `<header>:` surrounded by blank lines.
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}
