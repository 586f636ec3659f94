//! Background refresh of the listing cache.
//!
//! A [`DaemonHandle`] owns at most one worker thread. The worker runs a sweep right away
//! and then once per refresh period until [`DaemonHandle::stop`] is called. A sweep:
//!
//! 1. Calls the package status refresh action when the package database marker changed
//! 2. Skips everything else when the tree fingerprint matches the previous sweep
//! 3. Rebuilds and saves every target category, ignoring the per-category cache state
//! 4. Records the tree fingerprint as the baseline for the next sweep
//!
//! Stopping never interrupts a sweep; `stop` returns once the worker has exited.
//!
//! # Public API
//! - [`DaemonConfig`]: Directory, refresh period and package marker location
//! - [`Sweeper`]: One sweep and the forced refresh operations, usable without a thread
//! - [`DaemonHandle`]: Start/stop lifecycle around a [`Sweeper`]
//! - [`start_daemon`]: Start a daemon with default settings
//! - [`PackageStatusRefresh`]: Action invoked when the package database changes

use crate::core::builder::{normalize_category, ListBuilder};
use crate::core::enumeration::{
    ALL_ITEMS_CATEGORY, HIDDEN_CATEGORY, INSTALLED_CATEGORY, PACKAGES_CATEGORY,
};
use crate::core::error::{PreloadError, Result};
use crate::core::fingerprint::{unix_seconds, Fingerprint, FingerprintChecker};
use crate::core::store::{write_atomic, CacheStore};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(30);
pub const DEFAULT_PACKAGE_MARKER: &str = "/var/lib/dpkg/status";

/// Targets refreshed on every sweep before the metadata categories.
pub const FIXED_TARGETS: [&str; 3] = [ALL_ITEMS_CATEGORY, INSTALLED_CATEGORY, PACKAGES_CATEGORY];

const WORKER_THREAD_NAME: &str = "preload-daemon";

pub trait PackageStatusRefresh: Send + Sync {
    fn refresh(&self, directory: &Path) -> Result<()>;
}

/// Default action: records the change in the log and does nothing else.
#[derive(Debug, Clone, Default)]
pub struct LoggingPackageRefresh;

impl PackageStatusRefresh for LoggingPackageRefresh {
    fn refresh(&self, directory: &Path) -> Result<()> {
        log::info!(
            "Package database changed; package item status for {} should be refreshed",
            directory.display()
        );
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub directory: PathBuf,
    pub refresh_period: Duration,
    pub package_marker: PathBuf,
}

impl DaemonConfig {
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            refresh_period: DEFAULT_REFRESH_PERIOD,
            package_marker: PathBuf::from(DEFAULT_PACKAGE_MARKER),
        }
    }

    /// A zero period falls back to [`DEFAULT_REFRESH_PERIOD`].
    pub fn with_refresh_period(mut self, period: Duration) -> Self {
        self.refresh_period = if period.is_zero() {
            DEFAULT_REFRESH_PERIOD
        } else {
            period
        };
        self
    }

    pub fn with_package_marker(mut self, marker: impl Into<PathBuf>) -> Self {
        self.package_marker = marker.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// Nothing changed since the previous sweep
    Skipped,
    Completed { refreshed: usize, failed: usize },
    /// The target list could not be determined
    Aborted,
}

#[derive(Clone)]
pub struct Sweeper {
    config: DaemonConfig,
    builder: ListBuilder,
    store: CacheStore,
    checker: FingerprintChecker,
    package_refresh: Arc<dyn PackageStatusRefresh>,
}

impl Sweeper {
    pub fn new(config: DaemonConfig) -> Self {
        let builder = ListBuilder::new(&config.directory);
        Self::with_builder(config, builder)
    }

    pub fn with_builder(config: DaemonConfig, builder: ListBuilder) -> Self {
        Self {
            store: CacheStore::new(&config.directory),
            checker: FingerprintChecker::new(&config.directory),
            config,
            builder,
            package_refresh: Arc::new(LoggingPackageRefresh),
        }
    }

    pub fn with_package_refresh(mut self, action: Arc<dyn PackageStatusRefresh>) -> Self {
        self.package_refresh = action;
        self
    }

    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    /// Fixed targets first, then every named category in lexicographic order.
    pub fn targets(&self) -> Result<Vec<String>> {
        let assignments = self
            .builder
            .enumeration()
            .list_category_assignments(&self.config.directory)
            .map_err(|e| PreloadError::enumeration("", e))?;

        let mut targets: Vec<String> = FIXED_TARGETS.iter().map(|t| t.to_string()).collect();
        let categories: BTreeSet<String> = assignments
            .into_iter()
            .map(|assignment| assignment.category)
            .filter(|category| !category.is_empty() && category != HIDDEN_CATEGORY)
            .collect();
        for category in categories {
            if !targets.contains(&category) {
                targets.push(category);
            }
        }
        Ok(targets)
    }

    fn refresh_target(&self, target: &str, fingerprint: &Fingerprint) -> Result<()> {
        let target = normalize_category(target);
        let listing = self.builder.build(target)?;
        self.store.save(target, &listing)?;
        self.checker
            .persist(&self.store.fingerprint_path(target), fingerprint)
    }

    /// Rebuild one category and overwrite its cache files.
    pub fn refresh_category(&self, name: &str) -> Result<()> {
        let fingerprint = self.checker.compute();
        self.refresh_target(name, &fingerprint)
    }

    /// Rebuild every target. All targets are attempted; the first failure is returned.
    pub fn refresh_all(&self) -> Result<()> {
        let fingerprint = self.checker.compute();
        let mut first_error = None;

        for target in self.targets()? {
            if let Err(e) = self.refresh_target(&target, &fingerprint) {
                log::warn!("Failed to refresh '{target}': {e}");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Run the package status action if the marker's mtime differs from the recorded one.
    /// Returns whether the action ran.
    pub fn check_package_marker(&self) -> Result<bool> {
        let modified = match fs::metadata(&self.config.package_marker).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return Ok(false),
        };
        let current = unix_seconds(modified).to_string();

        let recorded = self.store.package_marker_path();
        if fs::read_to_string(&recorded).ok().as_deref() == Some(current.as_str()) {
            return Ok(false);
        }

        log::info!("Refreshing package item status");
        self.store.ensure_dir()?;
        write_atomic(&recorded, current.as_bytes())
            .map_err(|e| PreloadError::cache_write_failed(&recorded, e))?;
        self.package_refresh.refresh(&self.config.directory)?;
        Ok(true)
    }

    pub fn sweep(&self) -> SweepOutcome {
        if let Err(e) = self.check_package_marker() {
            log::warn!("Failed to refresh package item status: {e}");
        }

        let fingerprint = self.checker.compute();
        let baseline = self.store.daemon_baseline_path();
        if !self.checker.differs_from(&baseline, &fingerprint) {
            log::info!("Preload daemon skipped; nothing was changed");
            return SweepOutcome::Skipped;
        }

        log::info!("Preload daemon running...");
        let targets = match self.targets() {
            Ok(targets) => targets,
            Err(e) => {
                log::error!("Failed to determine preload targets: {e}");
                return SweepOutcome::Aborted;
            }
        };

        let mut refreshed = 0;
        let mut failed = 0;
        for target in &targets {
            match self.refresh_target(target, &fingerprint) {
                Ok(()) => refreshed += 1,
                Err(e) => {
                    log::warn!("Failed to preload '{target}': {e}");
                    failed += 1;
                }
            }
        }

        if let Err(e) = self.checker.persist(&baseline, &fingerprint) {
            log::warn!("Failed to save daemon fingerprint: {e}");
        }

        log::info!("Preload daemon done ({refreshed} refreshed, {failed} failed)");
        SweepOutcome::Completed { refreshed, failed }
    }
}

struct Worker {
    stop_tx: Sender<()>,
    thread: JoinHandle<()>,
}

fn run_worker(sweeper: Sweeper, period: Duration, stop_rx: Receiver<()>) {
    log::debug!("Preload daemon worker started, period {period:?}");
    loop {
        sweeper.sweep();
        match stop_rx.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    log::debug!("Preload daemon worker exiting");
}

pub struct DaemonHandle {
    sweeper: Sweeper,
    worker: Mutex<Option<Worker>>,
}

impl DaemonHandle {
    pub fn new(config: DaemonConfig) -> Self {
        Self::with_sweeper(Sweeper::new(config))
    }

    pub fn with_sweeper(sweeper: Sweeper) -> Self {
        Self {
            sweeper,
            worker: Mutex::new(None),
        }
    }

    pub fn sweeper(&self) -> &Sweeper {
        &self.sweeper
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    pub fn start(&self) -> Result<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Err(PreloadError::DaemonAlreadyRunning);
        }

        let (stop_tx, stop_rx) = bounded::<()>(1);
        let sweeper = self.sweeper.clone();
        let period = self.sweeper.config.refresh_period;
        let thread = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_owned())
            .spawn(move || run_worker(sweeper, period, stop_rx))
            .map_err(|source| PreloadError::DaemonSpawnFailed { source })?;

        *worker = Some(Worker { stop_tx, thread });
        log::info!(
            "Preload daemon started for {}",
            self.sweeper.config.directory.display()
        );
        Ok(())
    }

    /// Signal the worker and wait for it to finish its current sweep.
    pub fn stop(&self) -> Result<()> {
        let mut worker = self.worker.lock();
        let Worker { stop_tx, thread } = worker.take().ok_or(PreloadError::DaemonNotRunning)?;

        let _ = stop_tx.try_send(());
        drop(stop_tx);
        thread
            .join()
            .map_err(|_| PreloadError::DaemonThreadPanicked)?;

        log::info!("Preload daemon stopped");
        Ok(())
    }

    pub fn refresh_category(&self, name: &str) -> Result<()> {
        self.sweeper.refresh_category(name)
    }

    pub fn refresh_all(&self) -> Result<()> {
        self.sweeper.refresh_all()
    }
}

impl Drop for DaemonHandle {
    fn drop(&mut self) {
        if self.is_running() {
            if let Err(e) = self.stop() {
                log::warn!("Failed to stop preload daemon: {e}");
            }
        }
    }
}

/// Start a daemon for `directory` with the default period and package marker.
pub fn start_daemon(directory: &Path) -> Result<DaemonHandle> {
    let handle = DaemonHandle::new(DaemonConfig::new(directory));
    handle.start()?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn config(root: &Path) -> DaemonConfig {
        DaemonConfig::new(root).with_package_marker(root.join("dpkg-status"))
    }

    struct CountingRefresh(AtomicUsize);

    impl PackageStatusRefresh for CountingRefresh {
        fn refresh(&self, _directory: &Path) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = DaemonConfig::new(Path::new("/opt/apps"));
        assert_eq!(config.refresh_period, Duration::from_secs(30));
        assert_eq!(config.package_marker, PathBuf::from("/var/lib/dpkg/status"));
        let config = config.with_refresh_period(Duration::ZERO);
        assert_eq!(config.refresh_period, DEFAULT_REFRESH_PERIOD);
    }

    #[test]
    fn test_targets_order() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "apps/Chess/install", "");
        write(temp.path(), "apps/Firefox/install", "");
        write(temp.path(), "apps/Secret/install", "");
        write(temp.path(), "data/categories/Internet", "Firefox\n");
        write(temp.path(), "data/categories/Games", "Chess\n");
        write(temp.path(), "data/categories/hidden", "Secret\n");

        let targets = Sweeper::new(config(temp.path())).targets().unwrap();
        assert_eq!(
            targets,
            vec!["All Items", "Installed", "Packages", "Games", "Internet"]
        );
    }

    #[test]
    fn test_package_marker_triggers_once() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "dpkg-status", "Package: bash\n");
        let counter = Arc::new(CountingRefresh(AtomicUsize::new(0)));
        let sweeper = Sweeper::new(config(temp.path())).with_package_refresh(counter.clone());

        assert!(sweeper.check_package_marker().unwrap());
        assert!(!sweeper.check_package_marker().unwrap());
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_package_marker_is_skipped() {
        let temp = TempDir::new().unwrap();
        let sweeper = Sweeper::new(config(temp.path()));
        assert!(!sweeper.check_package_marker().unwrap());
    }

    #[test]
    fn test_start_stop_lifecycle() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "apps/Chess/install", "");
        let handle = DaemonHandle::new(config(temp.path()));

        assert!(matches!(handle.stop(), Err(PreloadError::DaemonNotRunning)));
        handle.start().unwrap();
        assert!(handle.is_running());
        assert!(matches!(handle.start(), Err(PreloadError::DaemonAlreadyRunning)));
        handle.stop().unwrap();
        assert!(!handle.is_running());
        assert!(matches!(handle.stop(), Err(PreloadError::DaemonNotRunning)));
    }
}
