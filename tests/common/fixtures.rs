//! Test data generation utilities and predefined scenarios
//!
//! Provides an application tree builder on top of a temporary directory and an
//! enumeration wrapper that counts how many listings were generated.

#![allow(dead_code)]

use app_preload::core::enumeration::{CategoryAssignment, EnumerationService, FsEnumeration};
use app_preload::core::error::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Application tree in a temporary directory. The TempDir must be kept alive for
/// the duration of the test to prevent cleanup.
pub struct AppTree {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl AppTree {
    /// Empty tree with an `apps/` directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        fs::create_dir_all(path.join("apps"))?;
        Ok(Self { temp_dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `content` to `relative`, creating parent directories
    pub fn file(&self, relative: &str, content: &str) -> Result<&Self> {
        let path = self.path.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(self)
    }

    /// Item directory with the given installer files and a description
    pub fn item(&self, name: &str, installers: &[&str], description: &str) -> Result<&Self> {
        for installer in installers {
            self.file(&format!("apps/{name}/{installer}"), "#!/bin/bash\n")?;
        }
        if installers.is_empty() {
            fs::create_dir_all(self.path.join("apps").join(name))?;
        }
        self.file(&format!("apps/{name}/description"), &format!("{description}\n"))
    }

    /// Category file listing `items`, one per line
    pub fn category(&self, name: &str, items: &[&str]) -> Result<&Self> {
        let mut content = items.join("\n");
        content.push('\n');
        self.file(&format!("data/categories/{name}"), &content)
    }

    pub fn status(&self, item: &str, status: &str) -> Result<&Self> {
        self.file(&format!("data/status/{item}"), &format!("{status}\n"))
    }

    pub fn setting(&self, name: &str, value: &str) -> Result<&Self> {
        self.file(&format!("data/settings/{name}"), &format!("{value}\n"))
    }

    pub fn preload_file(&self, name: &str) -> PathBuf {
        self.path.join("data").join("preload").join(name)
    }
}

/// Scenario: `Firefox` (installable here) and `OldTool` (32-bit only) in `Internet`,
/// plus `Chess` in `Games`. Firefox is installed.
pub fn create_store_tree() -> Result<AppTree> {
    let tree = AppTree::new()?;
    tree.item("Firefox", &["install"], "Web browser")?
        .item("OldTool", &["install-32"], "Legacy utility")?
        .item("Chess", &["install"], "Play chess")?
        .category("Internet", &["Firefox", "OldTool"])?
        .category("Games", &["Chess"])?
        .status("Firefox", "installed")?;
    Ok(tree)
}

/// Filesystem enumeration that counts generated listings.
pub struct CountingEnumeration {
    inner: FsEnumeration,
    builds: AtomicUsize,
}

impl CountingEnumeration {
    pub fn new() -> Self {
        Self {
            inner: FsEnumeration::with_word_size(64),
            builds: AtomicUsize::new(0),
        }
    }

    /// Number of virtual path queries, one per generated listing
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl EnumerationService for CountingEnumeration {
    fn list_virtual_paths(&self, directory: &Path, category: &str) -> io::Result<Vec<String>> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.inner.list_virtual_paths(directory, category)
    }

    fn list_compatible_items(&self, directory: &Path) -> io::Result<Vec<String>> {
        self.inner.list_compatible_items(directory)
    }

    fn list_category_assignments(&self, directory: &Path) -> io::Result<Vec<CategoryAssignment>> {
        self.inner.list_category_assignments(directory)
    }
}

/// Enumeration returning a fixed set of virtual paths for every category.
pub struct StaticEnumeration {
    pub paths: Vec<String>,
    pub compatible: Vec<String>,
}

impl EnumerationService for StaticEnumeration {
    fn list_virtual_paths(&self, _directory: &Path, _category: &str) -> io::Result<Vec<String>> {
        Ok(self.paths.clone())
    }

    fn list_compatible_items(&self, _directory: &Path) -> io::Result<Vec<String>> {
        Ok(self.compatible.clone())
    }

    fn list_category_assignments(&self, _directory: &Path) -> io::Result<Vec<CategoryAssignment>> {
        Ok(Vec::new())
    }
}
