//! Modification-state fingerprints of the application tree.
//!
//! A fingerprint is one line per monitored path, always in the same order:
//!
//! ```text
//! <path> <mtime> <latest-mtime> <latest-path>
//! ```
//!
//! The latest pair names the most recently modified file found by a recursive walk of a
//! directory and is left out for files, empty directories and missing paths. A missing
//! path reports an mtime of `0`. Unreadable entries inside a walk are ignored, so
//! computing a fingerprint never fails.
//!
//! # Public API
//! - [`Fingerprint`]: Opaque comparable fingerprint text
//! - [`compute_fingerprint`]: Build a fingerprint for an ordered list of paths
//! - [`FingerprintChecker`]: The fixed monitored set of an application directory
//! - [`MONITORED_PATHS`]: Monitored paths relative to the application directory

use crate::core::error::{PreloadError, Result};
use crate::core::store::write_atomic;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

/// Monitored paths, in fingerprint order.
pub const MONITORED_PATHS: &[&str] = &[
    "apps",
    "data/settings",
    "data/status",
    "etc",
    "icons/categories",
    "preload",
    "api",
    "data/category-overrides",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Fingerprint {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Seconds since the Unix epoch, `0` for times before it.
pub fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(_) => 0,
    }
}

fn modified_seconds(path: &Path) -> Option<i64> {
    let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok()?;
    Some(unix_seconds(modified))
}

/// Most recently modified non-directory entry below `dir`.
/// Ties keep the first entry in file name order.
fn latest_contained(dir: &Path) -> Option<(i64, PathBuf)> {
    let mut latest: Option<(i64, PathBuf)> = None;

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        if entry.file_type().is_dir() {
            continue;
        }
        let Some(seconds) = entry
            .metadata()
            .ok()
            .and_then(|meta| meta.modified().ok())
            .map(unix_seconds)
        else {
            continue;
        };

        let newer = match &latest {
            Some((best, _)) => seconds > *best,
            None => true,
        };
        if newer {
            latest = Some((seconds, entry.into_path()));
        }
    }

    latest
}

/// Fingerprint an ordered list of paths. Never fails.
pub fn compute_fingerprint<P: AsRef<Path>>(paths: &[P]) -> Fingerprint {
    let mut out = String::new();
    let mut buffer = itoa::Buffer::new();

    for path in paths {
        let path = path.as_ref();
        out.push_str(&path.to_string_lossy());
        out.push(' ');

        let Some(own) = modified_seconds(path) else {
            out.push_str("0 \n");
            continue;
        };
        out.push_str(buffer.format(own));
        out.push(' ');

        if path.is_dir() {
            if let Some((seconds, latest)) = latest_contained(path) {
                out.push_str(buffer.format(seconds));
                out.push(' ');
                out.push_str(&latest.to_string_lossy());
            }
        }
        out.push('\n');
    }

    Fingerprint(out)
}

#[derive(Debug, Clone)]
pub struct FingerprintChecker {
    monitored: Vec<PathBuf>,
}

impl FingerprintChecker {
    /// Checker over [`MONITORED_PATHS`] below `directory`.
    pub fn new(directory: &Path) -> Self {
        Self {
            monitored: MONITORED_PATHS
                .iter()
                .map(|relative| directory.join(relative))
                .collect(),
        }
    }

    pub fn with_paths(monitored: Vec<PathBuf>) -> Self {
        Self { monitored }
    }

    pub fn monitored(&self) -> &[PathBuf] {
        &self.monitored
    }

    pub fn compute(&self) -> Fingerprint {
        compute_fingerprint(&self.monitored)
    }

    /// Stored fingerprint, `None` when the file is missing or unreadable.
    pub fn stored(&self, file: &Path) -> Option<Fingerprint> {
        match fs::read_to_string(file) {
            Ok(content) => Some(Fingerprint(content)),
            Err(e) => {
                log::debug!("No usable fingerprint at {}: {}", file.display(), e);
                None
            }
        }
    }

    /// Compare `current` against the fingerprint stored in `file`.
    pub fn differs_from(&self, file: &Path, current: &Fingerprint) -> bool {
        match self.stored(file) {
            Some(previous) => previous != *current,
            None => true,
        }
    }

    /// True when the stored fingerprint is missing, unreadable or outdated.
    pub fn has_changed(&self, file: &Path) -> bool {
        self.differs_from(file, &self.compute())
    }

    pub fn persist(&self, file: &Path, fingerprint: &Fingerprint) -> Result<()> {
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| PreloadError::cache_directory_creation_failed(parent, e))?;
        }
        write_atomic(file, fingerprint.as_str().as_bytes()).map_err(|e| {
            log::error!("Failed to write fingerprint '{}': {}", file.display(), e);
            PreloadError::fingerprint_write_failed(file, e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use tempfile::TempDir;

    #[test]
    fn test_missing_path_contributes_zero() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let fingerprint = compute_fingerprint(&[&missing]);
        assert_eq!(fingerprint.as_str(), format!("{} 0 \n", missing.display()));
    }

    #[test]
    fn test_file_has_no_latest_pair() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("category-overrides");
        fs::write(&file, "a|b\n").unwrap();
        set_file_mtime(&file, FileTime::from_unix_time(1_700_000_000, 0)).unwrap();

        let fingerprint = compute_fingerprint(&[&file]);
        assert_eq!(
            fingerprint.as_str(),
            format!("{} 1700000000 \n", file.display())
        );
    }

    #[test]
    fn test_directory_reports_latest_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("apps");
        fs::create_dir_all(dir.join("Firefox")).unwrap();
        let older = dir.join("Firefox").join("description");
        let newer = dir.join("Firefox").join("install");
        fs::write(&older, "x").unwrap();
        fs::write(&newer, "y").unwrap();
        set_file_mtime(&older, FileTime::from_unix_time(1_600_000_000, 0)).unwrap();
        set_file_mtime(&newer, FileTime::from_unix_time(1_650_000_000, 0)).unwrap();

        let fingerprint = compute_fingerprint(&[&dir]);
        let line = fingerprint.as_str();
        assert!(line.ends_with(&format!(" 1650000000 {}\n", newer.display())));
        assert!(line.starts_with(&format!("{} ", dir.display())));
    }

    #[test]
    fn test_one_line_per_path_in_order() {
        let temp = TempDir::new().unwrap();
        let checker = FingerprintChecker::new(temp.path());
        let fingerprint = checker.compute();
        let lines: Vec<&str> = fingerprint.as_str().lines().collect();
        assert_eq!(lines.len(), MONITORED_PATHS.len());
        assert!(lines[0].starts_with(&temp.path().join("apps").display().to_string()));
        assert!(lines[7].contains("category-overrides"));
    }

    #[test]
    fn test_stable_without_changes() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("apps/Firefox")).unwrap();
        fs::write(temp.path().join("apps/Firefox/description"), "Browser").unwrap();
        let checker = FingerprintChecker::new(temp.path());
        assert_eq!(checker.compute(), checker.compute());
    }

    #[test]
    fn test_touching_nested_file_changes_fingerprint() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("data/status/Firefox");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "installed").unwrap();
        set_file_mtime(&file, FileTime::from_unix_time(1_600_000_000, 0)).unwrap();

        let checker = FingerprintChecker::new(temp.path());
        let before = checker.compute();
        set_file_mtime(&file, FileTime::from_unix_time(1_600_000_100, 0)).unwrap();
        assert_ne!(before, checker.compute());
    }

    #[test]
    fn test_has_changed_and_persist() -> Result<()> {
        let temp = TempDir::new()?;
        let checker = FingerprintChecker::new(temp.path());
        let stored = temp.path().join("data/preload/timestamps-Games");

        assert!(checker.has_changed(&stored));
        checker.persist(&stored, &checker.compute())?;
        assert!(!checker.has_changed(&stored));

        fs::write(&stored, "stale")?;
        assert!(checker.has_changed(&stored));
        Ok(())
    }

    #[test]
    fn test_unix_seconds_before_epoch() {
        let before = UNIX_EPOCH - std::time::Duration::from_secs(10);
        assert_eq!(unix_seconds(before), 0);
    }
}
