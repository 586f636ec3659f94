//! Listing generation for one category path.
//!
//! [`ListBuilder::build`] asks the enumeration service for the raw virtual paths under a
//! category, collapses nested paths into category rows, drops incompatible items and
//! decorates every row with metadata. Rows are emitted in this order:
//!
//! 1. The "updates available" category (root only, when an update marker is non-empty)
//! 2. A back row (everywhere except the root)
//! 3. Category rows
//! 4. Item rows
//!
//! A failed enumeration fails the whole build. A row whose fields cannot be stored is
//! logged and left out.

use crate::core::entry::{Entry, EntryFields, Listing, UPDATES_CATEGORY};
use crate::core::enumeration::{EnumerationService, FsEnumeration, HIDDEN_CATEGORY};
use crate::core::error::{PreloadError, Result};
use crate::core::metadata::{FsMetadata, MetadataSource};
use crate::core::settings::Settings;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const UPDATES_DESCRIPTION: &str =
    "Updates are available. Open this category to update your items.";
const BACK_NAME: &str = "Back";
const BACK_DESCRIPTION: &str = "Return to the previous location";

/// Trim trailing separators so `"Games/"` and `"Games"` address the same listing.
pub fn normalize_category(category: &str) -> &str {
    category.trim_end_matches('/')
}

/// Navigation path of the parent of `category`: `"A/B"` gives `"A/"`, `"A"` gives `""`.
pub fn parent_path(category: &str) -> String {
    match normalize_category(category).rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => format!("{parent}/"),
        _ => String::new(),
    }
}

/// Split virtual paths into category names and item names, both de-duplicated in
/// first-seen order. Items missing from `compatible` are dropped.
pub fn partition_paths(
    paths: &[String],
    compatible: &HashSet<String>,
) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut categories = Vec::new();
    let mut items = Vec::new();

    for path in paths {
        match path.split_once('/') {
            Some((category, _)) => {
                if seen.insert(format!("{category}/")) {
                    categories.push(category.to_string());
                }
            }
            None => {
                if seen.insert(path.clone()) && compatible.contains(path) {
                    items.push(path.clone());
                }
            }
        }
    }

    (categories, items)
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

#[derive(Clone)]
pub struct ListBuilder {
    directory: PathBuf,
    enumeration: Arc<dyn EnumerationService>,
    metadata: Arc<dyn MetadataSource>,
    settings: Settings,
}

impl ListBuilder {
    /// Builder backed by the filesystem enumeration and metadata sources.
    pub fn new(directory: &Path) -> Self {
        Self::with_services(
            directory,
            Arc::new(FsEnumeration::new()),
            Arc::new(FsMetadata),
        )
    }

    pub fn with_services(
        directory: &Path,
        enumeration: Arc<dyn EnumerationService>,
        metadata: Arc<dyn MetadataSource>,
    ) -> Self {
        Self {
            directory: directory.to_path_buf(),
            enumeration,
            metadata,
            settings: Settings::new(directory),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn enumeration(&self) -> &Arc<dyn EnumerationService> {
        &self.enumeration
    }

    /// Virtual paths below `category`, relative to it. The root omits hidden items.
    fn virtual_paths(&self, category: &str) -> Result<Vec<String>> {
        let paths = self
            .enumeration
            .list_virtual_paths(&self.directory, category)
            .map_err(|e| {
                log::error!("Failed to enumerate '{category}': {e}");
                PreloadError::enumeration(category, e)
            })?;

        if category.is_empty() {
            let hidden = format!("{HIDDEN_CATEGORY}/");
            return Ok(paths
                .into_iter()
                .filter(|path| !path.starts_with(&hidden))
                .collect());
        }

        let prefix = format!("{category}/");
        Ok(paths
            .into_iter()
            .filter_map(|path| path.strip_prefix(&prefix).map(str::to_string))
            .filter(|path| !path.is_empty())
            .collect())
    }

    fn compatible_items(&self) -> HashSet<String> {
        match self.enumeration.list_compatible_items(&self.directory) {
            Ok(items) => items.into_iter().collect(),
            Err(e) => {
                log::warn!("Failed to list compatible items: {e}");
                HashSet::new()
            }
        }
    }

    fn push_row(listing: &mut Listing, entry: Entry) {
        match entry.validate() {
            Ok(()) => listing.entries.push(entry),
            Err(e) => log::warn!("Skipping {} '{}': {}", entry.kind(), entry.name(), e),
        }
    }

    fn category_row(&self, prefix: &str, name: &str) -> Entry {
        Entry::category(EntryFields::new(
            name,
            format!("{}/", join_path(prefix, name)),
            self.metadata.category_description(name),
            self.metadata.category_icon(&self.directory, name),
        ))
    }

    fn item_row(&self, prefix: &str, name: &str) -> Entry {
        Entry::item(
            EntryFields::new(
                name,
                join_path(prefix, name),
                self.metadata.description(&self.directory, name),
                self.metadata.icon(&self.directory, name),
            ),
            self.metadata.status(&self.directory, name),
        )
    }

    fn updates_row(&self) -> Entry {
        let icon = self
            .directory
            .join("icons")
            .join("categories")
            .join(format!("{UPDATES_CATEGORY}.png"));
        Entry::updates(EntryFields::new(
            UPDATES_CATEGORY,
            format!("{UPDATES_CATEGORY}/"),
            UPDATES_DESCRIPTION,
            icon.to_string_lossy(),
        ))
    }

    fn back_row(&self, category: &str) -> Entry {
        let icon = self.directory.join("icons").join("back.png");
        Entry::back(EntryFields::new(
            BACK_NAME,
            parent_path(category),
            BACK_DESCRIPTION,
            icon.to_string_lossy(),
        ))
    }

    /// Generate the listing for `category` without consulting the cache.
    pub fn build(&self, category: &str) -> Result<Listing> {
        let category = normalize_category(category);
        let mut listing = Listing::new(category);

        if category.is_empty() && self.settings.updates_available() {
            Self::push_row(&mut listing, self.updates_row());
        }

        let paths = self.virtual_paths(category)?;
        let (mut categories, mut items) = partition_paths(&paths, &self.compatible_items());

        if self.settings.shuffle() {
            let mut rng = rand::thread_rng();
            categories.shuffle(&mut rng);
            items.shuffle(&mut rng);
        }

        if !category.is_empty() {
            Self::push_row(&mut listing, self.back_row(category));
        }
        for name in &categories {
            Self::push_row(&mut listing, self.category_row(category, name));
        }
        for name in &items {
            Self::push_row(&mut listing, self.item_row(category, name));
        }

        log::debug!(
            "Built '{}': {} categories, {} items",
            category,
            categories.len(),
            items.len()
        );
        Ok(listing)
    }
}
