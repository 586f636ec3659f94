//! Read-only view of the settings store and update markers.
//!
//! Settings are plain files under `<directory>/data/settings/` whose trimmed content is
//! the value. Nothing in this module writes to the application tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const SHUFFLE_SETTING: &str = "Shuffle App list";
const SHOW_APPS_SETTING: &str = "Show apps";
const UPDATE_MARKERS: &[&str] = &["updatable-files", "updatable-apps"];

/// Which kinds of items regular categories show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowApps {
    #[default]
    All,
    /// Hide items installed from the package manager
    Standard,
    /// Hide script-based items
    Packages,
}

impl ShowApps {
    pub fn from_setting(value: &str) -> Self {
        match value.trim() {
            "standard" => ShowApps::Standard,
            "packages" => ShowApps::Packages,
            _ => ShowApps::All,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    directory: PathBuf,
}

impl Settings {
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
        }
    }

    fn setting_path(&self, name: &str) -> PathBuf {
        self.directory.join("data").join("settings").join(name)
    }

    /// Trimmed value of a setting, `None` when the file cannot be read.
    pub fn value(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.setting_path(name))
            .ok()
            .map(|content| content.trim().to_string())
    }

    pub fn shuffle(&self) -> bool {
        self.value(SHUFFLE_SETTING).as_deref() == Some("Yes")
    }

    pub fn show_apps(&self) -> ShowApps {
        self.value(SHOW_APPS_SETTING)
            .map(|value| ShowApps::from_setting(&value))
            .unwrap_or_default()
    }

    /// True when either update marker file exists and is non-empty.
    pub fn updates_available(&self) -> bool {
        let status_dir = self.directory.join("data").join("update-status");
        UPDATE_MARKERS.iter().any(|marker| {
            fs::metadata(status_dir.join(marker))
                .map(|meta| meta.len() > 0)
                .unwrap_or(false)
        })
    }

    /// Last write to `data/announcements`, reported by the `config` command.
    pub fn announcements_modified(&self) -> Option<SystemTime> {
        fs::metadata(self.directory.join("data").join("announcements"))
            .and_then(|meta| meta.modified())
            .ok()
    }

    /// True when announcements were refreshed within `max_age`.
    pub fn announcements_fresh(&self, max_age: Duration) -> bool {
        self.announcements_modified()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())
            .map(|age| age <= max_age)
            .unwrap_or(false)
    }

    /// `"none"`, `"fresh"` or `"stale"` for display.
    pub fn announcements_state(&self, max_age: Duration) -> &'static str {
        if self.announcements_modified().is_none() {
            "none"
        } else if self.announcements_fresh(max_age) {
            "fresh"
        } else {
            "stale"
        }
    }
}
