//! On-demand listing access.
//!
//! [`Loader::load`] serves a cached listing while the stored fingerprint matches the
//! current tree and the list file has content. Otherwise it builds a fresh listing,
//! writes it back on a best-effort basis and returns it. Cache problems never reach the
//! caller; only a failed enumeration does.
//!
//! # Public API
//! - [`Loader`]: Cache-aware access bound to one application directory
//! - [`Loaded`]: A listing plus where it came from
//! - [`get`]: One-shot helper using the filesystem-backed defaults

use crate::core::builder::{normalize_category, ListBuilder};
use crate::core::entry::Listing;
use crate::core::error::Result;
use crate::core::fingerprint::FingerprintChecker;
use crate::core::store::CacheStore;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSource {
    Cache,
    Generated,
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub listing: Listing,
    pub source: ListingSource,
}

#[derive(Clone)]
pub struct Loader {
    builder: ListBuilder,
    store: CacheStore,
    checker: FingerprintChecker,
}

impl Loader {
    pub fn new(directory: &Path) -> Self {
        Self::with_builder(ListBuilder::new(directory))
    }

    pub fn with_builder(builder: ListBuilder) -> Self {
        let directory = builder.directory().to_path_buf();
        Self {
            builder,
            store: CacheStore::new(&directory),
            checker: FingerprintChecker::new(&directory),
        }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn load(&self, category: &str) -> Result<Loaded> {
        let category = normalize_category(category);
        let fingerprint_file = self.store.fingerprint_path(category);
        let current = self.checker.compute();

        let changed = self.checker.differs_from(&fingerprint_file, &current);
        let reusable = self.store.is_reusable(category);

        if !changed && reusable {
            match self.store.load(category) {
                Ok(listing) => {
                    log::info!("Reading cached list for '{category}'");
                    return Ok(Loaded {
                        listing,
                        source: ListingSource::Cache,
                    });
                }
                Err(e) if e.is_cache_miss() => {
                    log::debug!("Cached list for '{category}' vanished: {e}")
                }
                Err(e) => log::warn!("Cached list for '{category}' unusable: {e}"),
            }
        }

        log::info!("Generating list for '{category}'");
        let listing = self.builder.build(category)?;

        if let Err(e) = self.store.save(category, &listing) {
            log::warn!("Cache save failed (listing is still returned): {e}");
        }
        if let Err(e) = self.checker.persist(&fingerprint_file, &current) {
            log::warn!("Fingerprint save failed for '{category}': {e}");
        }

        Ok(Loaded {
            listing,
            source: ListingSource::Generated,
        })
    }

    pub fn get(&self, category: &str) -> Result<Listing> {
        self.load(category).map(|loaded| loaded.listing)
    }
}

/// Listing for `category` under `directory`, regenerated only when the cache is stale.
pub fn get(directory: &Path, category: &str) -> Result<Listing> {
    Loader::new(directory).get(category)
}
