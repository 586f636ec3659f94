//! Per-item and per-category display metadata.
//!
//! Lookups never fail: a missing or unreadable file yields a placeholder value.

use std::fs;
use std::path::Path;

pub const DESCRIPTION_UNAVAILABLE: &str = "Description unavailable";
pub const STATUS_UNINSTALLED: &str = "uninstalled";

const CATEGORY_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Browsers", "Internet browsers."),
    ("All Items", "Every available application in one long list."),
    (
        "Appearance",
        "Applications and themes which modify the look and feel of your OS.",
    ),
    (
        "System Management",
        "Apps that help you keep track of system resources and general system management.",
    ),
    ("Games", "Games and emulators."),
    ("Installed", "Every application you have installed."),
    (
        "Internet",
        "Browsers, chat clients, email clients, and so much more.",
    ),
    (
        "Multimedia",
        "Video playback and creation, audio playback and creation, and streaming alternatives.",
    ),
    ("Packages", "Simple apps that install directly from APT repositories."),
    (
        "Tools",
        "An assortment of helpful programs that don't already fit into another category.",
    ),
    (
        "Terminals",
        "Alternative terminal programs built for the modern age as well as to replicate your old vintage computer.",
    ),
    (
        "Programming",
        "Code editors, IDEs, and other applications to help you write and make other programs.",
    ),
    ("Creative Arts", "Drawing, painting, photo and movie editors."),
    (
        "Engineering",
        "3D printing slicers, CAD/modeling, and general design software.",
    ),
    (
        "Office",
        "Office suites (document and slideshow editors), and other office tools.",
    ),
    (
        "Emulation",
        "Applications that help you run non-ARM or non-Linux software.",
    ),
    (
        "Communication",
        "Internet messaging, calling, video chatting, and email clients.",
    ),
];

/// Static description of a category, empty when unknown.
pub fn category_description(category: &str) -> &'static str {
    CATEGORY_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, description)| *description)
        .unwrap_or("")
}

pub trait MetadataSource: Send + Sync {
    fn description(&self, directory: &Path, item: &str) -> String;
    fn icon(&self, directory: &Path, item: &str) -> String;
    fn status(&self, directory: &Path, item: &str) -> String;
    fn category_icon(&self, directory: &Path, category: &str) -> String;

    fn category_description(&self, category: &str) -> String {
        category_description(category).to_string()
    }
}

/// Reads metadata from the files of the application tree.
#[derive(Debug, Clone, Default)]
pub struct FsMetadata;

impl MetadataSource for FsMetadata {
    /// First line of `apps/<item>/description`.
    fn description(&self, directory: &Path, item: &str) -> String {
        let path = directory.join("apps").join(item).join("description");
        fs::read_to_string(path)
            .ok()
            .and_then(|content| {
                let first = content.lines().next()?.trim();
                (!first.is_empty()).then(|| first.to_string())
            })
            .unwrap_or_else(|| DESCRIPTION_UNAVAILABLE.to_string())
    }

    fn icon(&self, directory: &Path, item: &str) -> String {
        let icon = directory.join("apps").join(item).join("icon-24.png");
        if icon.is_file() {
            icon.to_string_lossy().into_owned()
        } else {
            directory
                .join("icons")
                .join("none-24.png")
                .to_string_lossy()
                .into_owned()
        }
    }

    fn status(&self, directory: &Path, item: &str) -> String {
        let path = directory.join("data").join("status").join(item);
        match fs::read_to_string(&path) {
            Ok(content) => content.trim().to_string(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => STATUS_UNINSTALLED.to_string(),
            Err(e) => {
                log::warn!("Cannot read status of '{item}': {e}");
                String::new()
            }
        }
    }

    fn category_icon(&self, directory: &Path, category: &str) -> String {
        let icons = directory.join("icons").join("categories");
        let icon = icons.join(format!("{category}.png"));
        if icon.is_file() {
            icon.to_string_lossy().into_owned()
        } else {
            icons.join("default.png").to_string_lossy().into_owned()
        }
    }
}
