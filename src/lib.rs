//! App Preload - a fingerprint-validated listing cache for a directory-based app store.
//!
//! This library builds per-category listings of an application tree, caches them as
//! line-based files, and serves them from cache until a modification-time fingerprint of
//! the tree changes. A background daemon keeps every category's cache warm.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - Cached listing access ([`Loader`], [`get`])
//! - List generation and the enumeration seam
//! - Tree fingerprinting and atomic cache storage
//! - The refresh daemon
//! - Error handling and result types
//! - UI templates and color system

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    get,
    // UI and formatting
    render_entry,
    render_template,
    render_template_plain,
    start_daemon,
    strip_ansi_codes,

    CacheStore,
    CategoryAssignment,
    // Background refresh
    DaemonConfig,
    DaemonHandle,
    // Listing model
    Entry,
    EntryFields,
    EntryKind,
    // Listing generation
    EnumerationService,
    Fingerprint,
    FingerprintChecker,
    FsEnumeration,
    FsMetadata,
    ListBuilder,
    Listing,
    ListingSource,
    Loaded,
    // Cached access
    Loader,
    MetadataSource,
    PackageStatusRefresh,
    PreloadConfig,
    // Error handling
    PreloadError,
    Result,
    SweepOutcome,
    Sweeper,

    TemplateContext,
    Templates,
    TEMPLATES,
};
