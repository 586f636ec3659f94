//! Persistent user configuration.
//!
//! Stored as JSON in `<config dir>/config.json`. A missing file means defaults.

use crate::core::daemon::{DaemonConfig, DEFAULT_PACKAGE_MARKER, DEFAULT_REFRESH_PERIOD};
use crate::core::dirs::get_config_directory;
use crate::core::error::{PreloadError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the application directory
pub const DIRECTORY_ENV: &str = "PI_APPS_DIR";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PreloadConfig {
    pub directory: Option<PathBuf>,
    pub refresh_period_secs: u64,
    pub package_marker: PathBuf,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            directory: None,
            refresh_period_secs: DEFAULT_REFRESH_PERIOD.as_secs(),
            package_marker: PathBuf::from(DEFAULT_PACKAGE_MARKER),
        }
    }
}

impl PreloadConfig {
    pub fn config_file() -> PathBuf {
        get_config_directory().join("config.json")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| PreloadError::config_parse(path, e))
    }

    /// Load the user config, falling back to defaults when it cannot be parsed.
    pub fn load_or_default() -> Self {
        let path = Self::config_file();
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config file: {e}");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Application directory: explicit flag, then [`DIRECTORY_ENV`], then the config file.
    pub fn resolve_directory(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        let directory = flag
            .or_else(|| std::env::var_os(DIRECTORY_ENV).map(PathBuf::from))
            .or_else(|| self.directory.clone())
            .ok_or(PreloadError::DirectoryNotSet)?;

        if !directory.is_dir() {
            return Err(PreloadError::directory_not_found(directory));
        }
        Ok(directory)
    }

    pub fn daemon_config(&self, directory: &Path) -> DaemonConfig {
        DaemonConfig::new(directory)
            .with_refresh_period(Duration::from_secs(self.refresh_period_secs))
            .with_package_marker(&self.package_marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = PreloadConfig::load_from(&temp.path().join("config.json")).unwrap();
        assert_eq!(config, PreloadConfig::default());
        assert_eq!(config.refresh_period_secs, 30);
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("nested/config.json");
        let config = PreloadConfig {
            directory: Some(temp.path().to_path_buf()),
            refresh_period_secs: 5,
            ..Default::default()
        };
        config.save_to(&path)?;
        assert_eq!(PreloadConfig::load_from(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{ "refresh_period_secs": 60 }"#)?;
        let config = PreloadConfig::load_from(&path)?;
        assert_eq!(config.refresh_period_secs, 60);
        assert_eq!(config.package_marker, PathBuf::from(DEFAULT_PACKAGE_MARKER));
        Ok(())
    }

    #[test]
    fn test_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = PreloadConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, PreloadError::ConfigParse { .. }));
    }

    #[test]
    fn test_flag_wins() {
        let temp = TempDir::new().unwrap();
        let config = PreloadConfig {
            directory: Some(PathBuf::from("/does/not/exist")),
            ..Default::default()
        };
        let resolved = config
            .resolve_directory(Some(temp.path().to_path_buf()))
            .unwrap();
        assert_eq!(resolved, temp.path());
    }

    #[test]
    fn test_daemon_config() {
        let config = PreloadConfig {
            refresh_period_secs: 0,
            package_marker: PathBuf::from("/tmp/marker"),
            ..Default::default()
        };
        let daemon = config.daemon_config(Path::new("/opt/apps"));
        assert_eq!(daemon.refresh_period, DEFAULT_REFRESH_PERIOD);
        assert_eq!(daemon.package_marker, PathBuf::from("/tmp/marker"));
    }
}
