//! Core functionality for the app-preload tool.
//!
//! This module provides the listing cache, the tree fingerprint, the list builder and
//! its enumeration seam, the refresh daemon, error handling and UI components.

pub mod builder;
pub mod colors;
pub mod config;
pub mod daemon;
pub mod dirs;
pub mod entry;
pub mod entry_kind;
pub mod enumeration;
pub mod error;
pub mod fingerprint;
pub mod loader;
pub mod metadata;
pub mod output;
pub mod settings;
pub mod store;
pub mod templates;

// === Error handling ===
// Core error types and result type used throughout the application
pub use error::{PreloadError, Result};

// === Listing model ===
// Rows of a category listing and the listing itself
pub use entry::{Entry, EntryFields, Listing, UPDATES_CATEGORY};
pub use entry_kind::EntryKind;

// === Cache storage ===
// Line-based list files written through a staged rename
pub use store::{write_atomic, CacheStore, StagedWrite};

// === Change detection ===
// Modification-time summary of the monitored parts of the tree
pub use fingerprint::{compute_fingerprint, Fingerprint, FingerprintChecker, MONITORED_PATHS};

// === Listing generation ===
// Builder plus the enumeration and metadata seams it queries
pub use builder::ListBuilder;
pub use enumeration::{CategoryAssignment, EnumerationService, FsEnumeration};
pub use metadata::{FsMetadata, MetadataSource};
pub use settings::{Settings, ShowApps};

// === Cached access ===
// Serve from cache when fresh, rebuild otherwise
pub use loader::{get, Loaded, Loader, ListingSource};

// === Background refresh ===
// Periodic sweep over every target category
pub use daemon::{
    start_daemon, DaemonConfig, DaemonHandle, LoggingPackageRefresh, PackageStatusRefresh,
    SweepOutcome, Sweeper,
};

// === Configuration ===
pub use config::{PreloadConfig, DIRECTORY_ENV};

// === UI templates ===
// Template system for consistent output formatting with colors
pub use templates::{
    render_entry, render_template, render_template_plain, strip_ansi_codes, TemplateContext,
    Templates, TEMPLATES,
};

// === Color system ===
pub use colors::{get_kind_marker, get_status_color_style};

// === Output formatting ===
// Unified output formatting for consistent CLI presentation
pub use output::{print_error, print_info, print_section_header, print_success};
