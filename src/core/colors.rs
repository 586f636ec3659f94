//! Status color mapping for listing output.
//!
//! # Public API
//! - [`get_status_color_style`]: Color function for an item status
//! - [`get_kind_marker`]: Colored row marker for an entry kind
//!
//! # Color Scheme
//! - **installed**: Green
//! - **uninstalled**: White
//! - **corrupted**: Red
//! - **disabled**: Bright black
//! - Anything else (categories, unknown states): Yellow

use crate::core::entry_kind::EntryKind;
use colored::*;

/// Returns a closure that applies the color of `status` to any text.
pub fn get_status_color_style(status: &str) -> Box<dyn Fn(&str) -> ColoredString> {
    match status {
        "installed" => Box::new(|text: &str| text.green()),
        "uninstalled" => Box::new(|text: &str| text.white()),
        "corrupted" => Box::new(|text: &str| text.red().bold()),
        "disabled" => Box::new(|text: &str| text.bright_black()),
        _ => Box::new(|text: &str| text.yellow()),
    }
}

pub fn get_kind_marker(kind: EntryKind) -> ColoredString {
    match kind {
        EntryKind::Item => kind.marker().normal(),
        EntryKind::Category => kind.marker().blue(),
        EntryKind::Back => kind.marker().bright_black(),
    }
}
