//! Type-safe listing row kinds.
//!
//! [`EntryKind`] replaces the string tags stored in the first field of every cache line.
//!
//! # Public API
//! - [`EntryKind`]: `item`, `category` or `back`
//!
//! # Key Features
//! - **Stable tags**: [`EntryKind::as_str`] is what gets written to disk
//! - **Legacy tags**: `app` is still accepted when reading older cache files
//! - **Display formatting**: Short markers for terminal output

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A leaf entry the user can act on
    Item,
    /// A navigable grouping of items
    Category,
    /// Navigation to the parent category
    Back,
}

impl EntryKind {
    /// Tag written to the first field of a cache line
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Item => "item",
            EntryKind::Category => "category",
            EntryKind::Back => "back",
        }
    }

    /// Parse a stored tag. Unknown tags yield `None` so the line can be skipped.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "item" | "app" => Some(EntryKind::Item),
            "category" => Some(EntryKind::Category),
            "back" => Some(EntryKind::Back),
            _ => None,
        }
    }

    /// Marker shown in front of a row in terminal output
    pub fn marker(&self) -> &'static str {
        match self {
            EntryKind::Item => " ",
            EntryKind::Category => "▸",
            EntryKind::Back => "◂",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
