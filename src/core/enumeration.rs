//! Item enumeration over the application tree.
//!
//! The [`EnumerationService`] trait is the seam the list builder and the refresh daemon
//! query for raw virtual paths. [`FsEnumeration`] is the default implementation and reads
//! the tree without modifying it.
//!
//! # Public API
//! - [`EnumerationService`]: Virtual paths, compatible items and category assignments
//! - [`FsEnumeration`]: Filesystem-backed implementation
//! - [`CategoryAssignment`]: One `item|category` pair
//!
//! # Tree Layout
//! - `apps/<item>/`: one directory per item
//! - `data/category-overrides`: `item|category` lines, highest precedence
//! - `data/categories/<Category>`: one item name per line
//! - `data/status/<item>`: install state of an item
//! - `data/deprecated-apps/<item>/metadata`: marks a deprecated item

use crate::core::settings::{Settings, ShowApps};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

pub const ALL_ITEMS_CATEGORY: &str = "All Items";
pub const INSTALLED_CATEGORY: &str = "Installed";
pub const PACKAGES_CATEGORY: &str = "Packages";
pub const DEPRECATED_CATEGORY: &str = "Deprecated";
pub const HIDDEN_CATEGORY: &str = "hidden";

const INSTALLER_FILES: &[&str] = &["install", "packages", "flatpak_packages"];
const SCRIPT_FILES: &[&str] = &["install", "install-32", "install-64", "uninstall"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAssignment {
    pub item: String,
    /// Empty for items without a category
    pub category: String,
}

impl CategoryAssignment {
    pub fn new(item: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            category: category.into(),
        }
    }
}

pub trait EnumerationService: Send + Sync {
    /// Virtual paths visible under `category`, each `<category>/<item>` or `<category>/`.
    /// The root (`""`) yields paths for every top-level category.
    fn list_virtual_paths(&self, directory: &Path, category: &str) -> io::Result<Vec<String>>;

    /// Items that can be installed on this machine.
    fn list_compatible_items(&self, directory: &Path) -> io::Result<Vec<String>>;

    /// Category of every known item, first assignment wins.
    fn list_category_assignments(&self, directory: &Path) -> io::Result<Vec<CategoryAssignment>>;
}

#[derive(Debug, Clone)]
pub struct FsEnumeration {
    word_size: u32,
}

impl Default for FsEnumeration {
    fn default() -> Self {
        Self {
            word_size: if cfg!(target_pointer_width = "64") { 64 } else { 32 },
        }
    }
}

fn has_file(directory: &Path, item: &str, name: &str) -> bool {
    directory.join("apps").join(item).join(name).is_file()
}

fn prefixed(prefix: &str, item: &str) -> String {
    format!("{prefix}/{item}")
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|content| {
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl FsEnumeration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the word size used to match `install-32` / `install-64` scripts.
    pub fn with_word_size(word_size: u32) -> Self {
        Self { word_size }
    }

    /// Every directory under `apps/`, sorted.
    fn item_dirs(&self, directory: &Path) -> io::Result<Vec<String>> {
        let mut items = Vec::new();
        for entry in fs::read_dir(directory.join("apps"))? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                items.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        items.sort();
        Ok(items)
    }

    /// Items that ship an installer of any kind.
    fn local_items(&self, directory: &Path) -> io::Result<Vec<String>> {
        Ok(self
            .item_dirs(directory)?
            .into_iter()
            .filter(|item| {
                INSTALLER_FILES
                    .iter()
                    .any(|name| has_file(directory, item, name))
            })
            .collect())
    }

    fn is_compatible(&self, directory: &Path, item: &str) -> bool {
        let arch_script = format!("install-{}", self.word_size);
        INSTALLER_FILES
            .iter()
            .any(|name| has_file(directory, item, name))
            || has_file(directory, item, &arch_script)
    }

    fn is_package(&self, directory: &Path, item: &str) -> bool {
        has_file(directory, item, "packages")
    }

    fn is_standard(&self, directory: &Path, item: &str) -> bool {
        SCRIPT_FILES.iter().any(|name| has_file(directory, item, name))
    }

    fn passes_show_apps(&self, directory: &Path, item: &str, show: ShowApps) -> bool {
        match show {
            ShowApps::All => true,
            ShowApps::Standard => !self.is_package(directory, item),
            ShowApps::Packages => !self.is_standard(directory, item),
        }
    }

    fn deprecated_items(&self, directory: &Path) -> Vec<String> {
        let deprecated_dir = directory.join("data").join("deprecated-apps");
        let Ok(entries) = fs::read_dir(&deprecated_dir) else {
            return Vec::new();
        };

        let mut items: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().join("metadata").is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        items.sort();
        items
    }

    fn installed_items(&self, directory: &Path) -> io::Result<Vec<String>> {
        let status_dir = directory.join("data").join("status");
        let mut candidates = self.local_items(directory)?;
        for item in self.deprecated_items(directory) {
            if status_dir.join(&item).is_file() && !candidates.contains(&item) {
                candidates.push(item);
            }
        }

        let mut installed: Vec<String> = candidates
            .into_iter()
            .filter(|item| {
                fs::read_to_string(status_dir.join(item))
                    .map(|status| status.trim() == "installed")
                    .unwrap_or(false)
            })
            .collect();
        installed.sort();
        Ok(installed)
    }

    fn package_items(&self, directory: &Path) -> io::Result<Vec<String>> {
        Ok(self
            .item_dirs(directory)?
            .into_iter()
            .filter(|item| self.is_package(directory, item))
            .collect())
    }

    fn compatible_items(&self, directory: &Path) -> io::Result<Vec<String>> {
        Ok(self
            .item_dirs(directory)?
            .into_iter()
            .filter(|item| self.is_compatible(directory, item))
            .collect())
    }

    fn hidden_items(assignments: &[CategoryAssignment]) -> HashSet<String> {
        assignments
            .iter()
            .filter(|assignment| assignment.category == HIDDEN_CATEGORY)
            .map(|assignment| assignment.item.clone())
            .collect()
    }
}

impl EnumerationService for FsEnumeration {
    fn list_virtual_paths(&self, directory: &Path, category: &str) -> io::Result<Vec<String>> {
        let category = category.trim_end_matches('/');
        let show = Settings::new(directory).show_apps();
        let assignments = self.list_category_assignments(directory)?;
        let hidden = Self::hidden_items(&assignments);
        let visible = |items: Vec<String>| -> Vec<String> {
            items
                .into_iter()
                .filter(|item| !hidden.contains(item))
                .collect()
        };

        let mut paths = Vec::new();
        match category {
            DEPRECATED_CATEGORY => {
                for item in self.deprecated_items(directory) {
                    paths.push(prefixed(DEPRECATED_CATEGORY, &item));
                }
            }
            INSTALLED_CATEGORY => {
                for item in visible(self.installed_items(directory)?) {
                    paths.push(prefixed(INSTALLED_CATEGORY, &item));
                }
            }
            PACKAGES_CATEGORY => {
                for item in visible(self.package_items(directory)?) {
                    paths.push(prefixed(PACKAGES_CATEGORY, &item));
                }
            }
            ALL_ITEMS_CATEGORY => {
                for item in visible(self.compatible_items(directory)?) {
                    if self.passes_show_apps(directory, &item, show) {
                        paths.push(prefixed(ALL_ITEMS_CATEGORY, &item));
                    }
                }
            }
            "" => {
                for assignment in &assignments {
                    if assignment.category.is_empty()
                        || assignment.category == HIDDEN_CATEGORY
                        || hidden.contains(&assignment.item)
                    {
                        continue;
                    }
                    if self.passes_show_apps(directory, &assignment.item, show) {
                        paths.push(prefixed(&assignment.category, &assignment.item));
                    }
                }
                for item in visible(self.installed_items(directory)?) {
                    paths.push(prefixed(INSTALLED_CATEGORY, &item));
                }
                if show != ShowApps::Standard {
                    for item in visible(self.package_items(directory)?) {
                        paths.push(prefixed(PACKAGES_CATEGORY, &item));
                    }
                }
                for item in visible(self.compatible_items(directory)?) {
                    if self.passes_show_apps(directory, &item, show) {
                        paths.push(prefixed(ALL_ITEMS_CATEGORY, &item));
                    }
                }
                if !self.deprecated_items(directory).is_empty() {
                    paths.push(format!("{DEPRECATED_CATEGORY}/"));
                }
            }
            _ => {
                let nested = format!("{category}/");
                for assignment in &assignments {
                    let matches = assignment.category == category
                        || assignment.category.starts_with(&nested);
                    if !matches || hidden.contains(&assignment.item) {
                        continue;
                    }
                    if self.passes_show_apps(directory, &assignment.item, show) {
                        paths.push(prefixed(&assignment.category, &assignment.item));
                    }
                }
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn list_compatible_items(&self, directory: &Path) -> io::Result<Vec<String>> {
        self.compatible_items(directory)
    }

    fn list_category_assignments(&self, directory: &Path) -> io::Result<Vec<CategoryAssignment>> {
        let items = self.local_items(directory)?;
        let mut seen: HashSet<String> = HashSet::new();
        let mut assignments = Vec::new();

        let overrides = directory.join("data").join("category-overrides");
        for line in read_lines(&overrides) {
            if line.starts_with('#') {
                continue;
            }
            let mut parts = line.split('|');
            let (Some(item), Some(category)) = (parts.next(), parts.next()) else {
                continue;
            };
            let item = item.trim();
            if item.is_empty() || !directory.join("apps").join(item).is_dir() {
                continue;
            }
            if seen.insert(item.to_string()) {
                assignments.push(CategoryAssignment::new(item, category.trim()));
            }
        }

        let categories_dir = directory.join("data").join("categories");
        if let Ok(entries) = fs::read_dir(&categories_dir) {
            let mut files: Vec<_> = entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .collect();
            files.sort_by_key(|entry| entry.file_name());

            for entry in files {
                let category = entry.file_name().to_string_lossy().into_owned();
                for item in read_lines(&entry.path()) {
                    if seen.insert(item.clone()) {
                        assignments.push(CategoryAssignment::new(item, category.clone()));
                    }
                }
            }
        }

        for item in items {
            if seen.insert(item.clone()) {
                assignments.push(CategoryAssignment::new(item, ""));
            }
        }

        Ok(assignments)
    }
}
