//! On-disk listing cache.
//!
//! Every category path owns two files under `<directory>/data/preload/`:
//! `LIST-<name>` holds one `kind|name|path|description|icon|status` line per entry and
//! `timestamps-<name>` holds the fingerprint captured when the list was generated.
//! `<name>` is the category path with every `/` removed. Distinct paths that only differ
//! in separator placement map to the same file; existing cache directories rely on this
//! naming so it is kept as is.
//!
//! # Public API
//! - [`CacheStore`]: Path layout, save and load
//! - [`StagedWrite`]: Temporary sibling file that replaces its target on [`StagedWrite::commit`]
//! - [`sanitize_category`]: Category path to file name suffix
//!
//! # Write Strategy
//! - Content goes to a uniquely named sibling file, is synced, then renamed over the target
//! - Readers see either the previous file or the new one, never a partial write
//! - A staged write that is dropped without committing removes its temporary file

use crate::core::entry::{Entry, EntryFields, Listing, UPDATES_CATEGORY};
use crate::core::entry_kind::EntryKind;
use crate::core::error::{PreloadError, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

pub const FIELD_DELIMITER: char = '|';
const FIELD_COUNT: usize = 6;

const DAEMON_BASELINE_FILE: &str = "timestamps-preload-daemon";
const PACKAGE_MARKER_FILE: &str = "timestamps-dpkg-status";

static STAGE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Strip path separators from a category path to build a file name suffix.
pub fn sanitize_category(category: &str) -> String {
    category.chars().filter(|c| *c != '/').collect()
}

/// Write-then-rename handle for a single destination file.
#[derive(Debug)]
pub struct StagedWrite {
    target: PathBuf,
    temp: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl StagedWrite {
    pub fn create(target: impl Into<PathBuf>) -> io::Result<Self> {
        let target = target.into();
        let mut temp_name = target.as_os_str().to_owned();
        temp_name.push(format!(
            "-tmp-{}-{}",
            std::process::id(),
            STAGE_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let temp = PathBuf::from(temp_name);
        let file = File::create(&temp)?;

        Ok(Self {
            target,
            temp,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.write_all(bytes),
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                "staged write already finished",
            )),
        }
    }

    /// Flush, sync and atomically move the staged content over the target.
    pub fn commit(mut self) -> io::Result<()> {
        let writer = self.writer.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::Other, "staged write already finished")
        })?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        if let Err(e) = fs::rename(&self.temp, &self.target) {
            let _ = fs::remove_file(&self.temp);
            return Err(e);
        }
        Ok(())
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            let _ = fs::remove_file(&self.temp);
        }
    }
}

/// Write `bytes` to `target` through a [`StagedWrite`].
pub fn write_atomic(target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut staged = StagedWrite::create(target)?;
    staged.write_all(bytes)?;
    staged.commit()
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    preload_dir: PathBuf,
}

impl CacheStore {
    pub fn new(directory: &Path) -> Self {
        Self {
            preload_dir: directory.join("data").join("preload"),
        }
    }

    pub fn preload_dir(&self) -> &Path {
        &self.preload_dir
    }

    pub fn list_path(&self, category: &str) -> PathBuf {
        self.preload_dir
            .join(format!("LIST-{}", sanitize_category(category)))
    }

    pub fn fingerprint_path(&self, category: &str) -> PathBuf {
        self.preload_dir
            .join(format!("timestamps-{}", sanitize_category(category)))
    }

    pub fn daemon_baseline_path(&self) -> PathBuf {
        self.preload_dir.join(DAEMON_BASELINE_FILE)
    }

    pub fn package_marker_path(&self) -> PathBuf {
        self.preload_dir.join(PACKAGE_MARKER_FILE)
    }

    pub fn ensure_dir(&self) -> Result<()> {
        if let Err(e) = fs::create_dir_all(&self.preload_dir) {
            log::error!(
                "Failed to create cache directory '{}': {}",
                self.preload_dir.display(),
                e
            );
            return Err(PreloadError::cache_directory_creation_failed(
                &self.preload_dir,
                e,
            ));
        }
        Ok(())
    }

    /// True when the list file exists and has content.
    pub fn is_reusable(&self, category: &str) -> bool {
        fs::metadata(self.list_path(category))
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    /// Serialize `listing` into a staged write for `category` without committing it.
    pub fn stage(&self, category: &str, listing: &Listing) -> Result<StagedWrite> {
        self.ensure_dir()?;

        let list_file = self.list_path(category);
        log::debug!("Staging {} entries for {}", listing.len(), list_file.display());

        let mut content = String::new();
        for entry in listing {
            content.push_str(&encode_entry(entry));
            content.push('\n');
        }

        let mut staged = StagedWrite::create(&list_file)
            .map_err(|e| PreloadError::cache_write_failed(&list_file, e))?;
        staged
            .write_all(content.as_bytes())
            .map_err(|e| PreloadError::cache_write_failed(&list_file, e))?;
        Ok(staged)
    }

    pub fn save(&self, category: &str, listing: &Listing) -> Result<()> {
        let list_file = self.list_path(category);
        let staged = self.stage(category, listing)?;

        if let Err(e) = staged.commit() {
            log::error!(
                "Failed to write cache file '{}': {}",
                list_file.display(),
                e
            );
            return Err(PreloadError::cache_write_failed(&list_file, e));
        }

        log::debug!("Cached {} entries for '{}'", listing.len(), category);
        Ok(())
    }

    /// Read the cached listing for `category`, skipping lines that do not parse.
    pub fn load(&self, category: &str) -> Result<Listing> {
        let list_file = self.list_path(category);

        let content = match fs::read_to_string(&list_file) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PreloadError::cache_file_not_found(&list_file));
            }
            Err(e) => return Err(PreloadError::cache_read_failed(&list_file, e)),
        };

        let mut entries = Vec::new();
        for (number, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            match decode_entry(line) {
                Some(entry) => entries.push(entry),
                None => log::debug!(
                    "Skipping malformed line {} in {}",
                    number + 1,
                    list_file.display()
                ),
            }
        }

        Ok(Listing::with_entries(category, entries))
    }
}

pub fn encode_entry(entry: &Entry) -> String {
    let fields = entry.fields();
    [
        entry.kind().as_str(),
        fields.name.as_str(),
        fields.path.as_str(),
        fields.description.as_str(),
        fields.icon.as_str(),
        entry.status(),
    ]
    .join("|")
}

/// The updates flag is not stored; only the root-level `Updates/` row carries it.
fn is_updates_row(fields: &EntryFields) -> bool {
    fields.name == UPDATES_CATEGORY
        && fields.path.strip_suffix('/') == Some(UPDATES_CATEGORY)
}

/// Parse one cache line. Returns `None` for a wrong field count or an unknown kind.
pub fn decode_entry(line: &str) -> Option<Entry> {
    let parts: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if parts.len() != FIELD_COUNT {
        return None;
    }

    let kind = EntryKind::from_tag(parts[0])?;
    let fields = EntryFields::new(parts[1], parts[2], parts[3], parts[4]);
    let entry = match kind {
        EntryKind::Item => Entry::item(fields, parts[5]),
        EntryKind::Category if is_updates_row(&fields) => Entry::updates(fields),
        EntryKind::Category => Entry::category(fields),
        EntryKind::Back => Entry::back(fields),
    };
    Some(entry)
}
