//! Listing data structures.
//!
//! A [`Listing`] is the ordered set of rows produced for one category path. Rows are
//! immutable once built; a listing is always regenerated wholesale.
//!
//! # Public API
//! - [`EntryFields`]: Display fields shared by every row
//! - [`Entry`]: A row, one variant per [`EntryKind`]
//! - [`Listing`]: Ordered rows plus the category path and generation time

use crate::core::entry_kind::EntryKind;
use crate::core::error::{PreloadError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Name of the synthetic category shown when updates are pending
pub const UPDATES_CATEGORY: &str = "Updates";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFields {
    pub name: String,
    pub path: String,
    pub description: String,
    pub icon: String,
}

impl EntryFields {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            description: description.into(),
            icon: icon.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entry {
    Item {
        #[serde(flatten)]
        fields: EntryFields,
        status: String,
    },
    Category {
        #[serde(flatten)]
        fields: EntryFields,
        is_updates: bool,
    },
    Back {
        #[serde(flatten)]
        fields: EntryFields,
    },
}

impl Entry {
    pub fn item(fields: EntryFields, status: impl Into<String>) -> Self {
        Entry::Item {
            fields,
            status: status.into(),
        }
    }

    pub fn category(fields: EntryFields) -> Self {
        Entry::Category {
            fields,
            is_updates: false,
        }
    }

    /// The synthetic "updates available" category
    pub fn updates(fields: EntryFields) -> Self {
        Entry::Category {
            fields,
            is_updates: true,
        }
    }

    pub fn back(fields: EntryFields) -> Self {
        Entry::Back { fields }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Item { .. } => EntryKind::Item,
            Entry::Category { .. } => EntryKind::Category,
            Entry::Back { .. } => EntryKind::Back,
        }
    }

    pub fn fields(&self) -> &EntryFields {
        match self {
            Entry::Item { fields, .. } | Entry::Category { fields, .. } | Entry::Back { fields } => {
                fields
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.fields().name
    }

    pub fn path(&self) -> &str {
        &self.fields().path
    }

    pub fn description(&self) -> &str {
        &self.fields().description
    }

    pub fn icon(&self) -> &str {
        &self.fields().icon
    }

    /// Item status, empty for categories and back rows
    pub fn status(&self) -> &str {
        match self {
            Entry::Item { status, .. } => status,
            _ => "",
        }
    }

    pub fn is_updates(&self) -> bool {
        matches!(self, Entry::Category { is_updates: true, .. })
    }

    /// Check that every stored field fits the `|`-delimited line format.
    pub fn validate(&self) -> Result<()> {
        let fields = self.fields();
        let checks: [(&'static str, &str); 5] = [
            ("name", &fields.name),
            ("path", &fields.path),
            ("description", &fields.description),
            ("icon", &fields.icon),
            ("status", self.status()),
        ];
        for (field, value) in checks {
            if value.contains(['|', '\n', '\r']) {
                return Err(PreloadError::invalid_field(field, value));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub category: String,
    pub entries: Vec<Entry>,
    pub generated: DateTime<Utc>,
}

impl Listing {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            entries: Vec::new(),
            generated: Utc::now(),
        }
    }

    pub fn with_entries(category: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            entries,
            ..Self::new(category)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
