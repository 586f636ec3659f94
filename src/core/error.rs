//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`PreloadError`] which covers every failure the listing cache
//! can report. It uses `thiserror` for the definitions and provides constructor helpers
//! for the failure scenarios that carry a path.
//!
//! # Public API
//! - [`PreloadError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, PreloadError>`
//!
//! # Error Categories
//! - **Enumeration**: The item tree could not be listed (fatal to a build)
//! - **Cache operations**: Directory creation, read and write failures
//! - **Entries**: Fields that cannot be stored in the line format
//! - **Daemon lifecycle**: Double start, stop while stopped, worker failures
//! - **Configuration**: Missing base directory, unreadable config file

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for app-preload
#[derive(Error, Debug)]
pub enum PreloadError {
    // Configuration errors
    #[error("No application directory configured. Pass --directory or set PI_APPS_DIR")]
    DirectoryNotSet,

    #[error("Application directory does not exist: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    // Enumeration errors
    #[error("Failed to enumerate items for '{category}': {source}")]
    Enumeration {
        category: String,
        source: std::io::Error,
    },

    // Entry errors
    #[error("Invalid {field} '{value}': fields must not contain '|' or line breaks")]
    InvalidField { field: &'static str, value: String },

    // Cache errors
    #[error("Failed to create cache directory '{path}': {source}")]
    CacheDirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write cache file '{path}': {source}")]
    CacheWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cache file does not exist at '{path}'")]
    CacheFileNotFound { path: PathBuf },

    #[error("Failed to read cache file '{path}': {source}")]
    CacheReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write fingerprint file '{path}': {source}")]
    FingerprintWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    // Daemon errors
    #[error("Preload daemon is already running")]
    DaemonAlreadyRunning,

    #[error("Preload daemon is not running")]
    DaemonNotRunning,

    #[error("Failed to spawn preload daemon thread: {source}")]
    DaemonSpawnFailed { source: std::io::Error },

    #[error("Preload daemon thread panicked")]
    DaemonThreadPanicked,

    #[error("Package status refresh failed: {message}")]
    PackageRefresh { message: String },

    #[error("Failed to install signal handler: {message}")]
    SignalHandler { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using PreloadError
pub type Result<T> = std::result::Result<T, PreloadError>;

impl PreloadError {
    /// Create a directory not found error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DirectoryNotFound { path: path.into() }
    }

    /// Create a config parse error
    pub fn config_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    /// Create an enumeration error for a category path
    pub fn enumeration(category: impl Into<String>, source: std::io::Error) -> Self {
        Self::Enumeration {
            category: category.into(),
            source,
        }
    }

    /// Create an invalid field error
    pub fn invalid_field(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            value: value.into(),
        }
    }

    /// Create a cache directory creation failed error
    pub fn cache_directory_creation_failed(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::CacheDirectoryCreationFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a cache write failed error
    pub fn cache_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheWriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a cache file not found error
    pub fn cache_file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::CacheFileNotFound { path: path.into() }
    }

    /// Create a cache read failed error
    pub fn cache_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a fingerprint write failed error
    pub fn fingerprint_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FingerprintWriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a package refresh error
    pub fn package_refresh(message: impl Into<String>) -> Self {
        Self::PackageRefresh {
            message: message.into(),
        }
    }

    /// True for errors that mean "no usable cache", which callers treat as a
    /// request to regenerate rather than a failure.
    pub fn is_cache_miss(&self) -> bool {
        matches!(
            self,
            Self::CacheFileNotFound { .. } | Self::CacheReadFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PreloadError::DaemonAlreadyRunning;
        assert_eq!(err.to_string(), "Preload daemon is already running");
    }

    #[test]
    fn test_directory_not_set_mentions_env() {
        let err = PreloadError::DirectoryNotSet;
        assert!(err.to_string().contains("PI_APPS_DIR"));
    }

    #[test]
    fn test_enumeration_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no apps dir");
        let err = PreloadError::enumeration("Games", io_err);
        assert!(err.to_string().contains("'Games'"));
        assert!(err.to_string().contains("no apps dir"));
    }

    #[test]
    fn test_invalid_field_error() {
        let err = PreloadError::invalid_field("name", "a|b");
        assert_eq!(
            err.to_string(),
            "Invalid name 'a|b': fields must not contain '|' or line breaks"
        );
    }

    #[test]
    fn test_cache_directory_creation_failed() {
        let path = std::path::PathBuf::from("/test/path");
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err = PreloadError::cache_directory_creation_failed(&path, io_err);
        assert!(err.to_string().contains("/test/path"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_cache_write_failed() {
        let path = std::path::PathBuf::from("/test/LIST-Games");
        let io_err = std::io::Error::new(std::io::ErrorKind::OutOfMemory, "no space left");
        let err = PreloadError::cache_write_failed(&path, io_err);
        assert!(err.to_string().contains("/test/LIST-Games"));
        assert!(err.to_string().contains("no space left"));
    }

    #[test]
    fn test_cache_file_not_found() {
        let err = PreloadError::cache_file_not_found("/test/LIST-");
        assert!(err.to_string().contains("/test/LIST-"));
        assert!(err.to_string().contains("does not exist"));
        assert!(err.is_cache_miss());
    }

    #[test]
    fn test_cache_read_failed_is_cache_miss() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = PreloadError::cache_read_failed("/test/LIST-Tools", io_err);
        assert!(err.to_string().contains("access denied"));
        assert!(err.is_cache_miss());
        assert!(!PreloadError::DaemonNotRunning.is_cache_miss());
    }

    #[test]
    fn test_config_parse() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ invalid json").unwrap_err();
        let err = PreloadError::config_parse("/test/config.json", json_err);
        assert!(err.to_string().contains("/test/config.json"));
        assert!(err.to_string().contains("Failed to parse"));
    }
}
