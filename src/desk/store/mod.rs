//! Ordered, authoritative collection of found items and its file snapshot.

pub mod record;

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{Item, ItemId};
use record::RecordShape;

/// Error enumeration for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("item {0} already exists")]
    DuplicateId(ItemId),
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("storage i/o failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result of a removal request that found its item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed(ItemId),
    AlreadyRemoved(ItemId),
}

impl RemovalOutcome {
    pub fn id(&self) -> &ItemId {
        match self {
            RemovalOutcome::Removed(id) | RemovalOutcome::AlreadyRemoved(id) => id,
        }
    }

    pub fn changed(&self) -> bool {
        matches!(self, RemovalOutcome::Removed(_))
    }
}

/// Counts gathered while reading a store file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub migrated: usize,
    pub skipped: usize,
}

/// Headline numbers for a dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStatistics {
    pub total: usize,
    pub active: usize,
    pub removed: usize,
    pub found_today: usize,
}

/// In-memory item list. Insertion order is preserved and items are never
/// dropped; removal only flips their status.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: Vec<Item>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn append(&mut self, item: Item) -> Result<&Item, StoreError> {
        if self.items.iter().any(|existing| existing.id() == item.id()) {
            return Err(StoreError::DuplicateId(item.id().clone()));
        }
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Exact id first, then the first id starting with `id_or_prefix`.
    pub fn get(&self, id_or_prefix: &str) -> Option<&Item> {
        self.position(id_or_prefix).map(|idx| &self.items[idx])
    }

    /// Soft-remove the matching item. Removing an already removed item is a
    /// no-op; an unknown id leaves the store untouched.
    pub fn mark_removed(&mut self, id_or_prefix: &str) -> Result<RemovalOutcome, StoreError> {
        let idx = self
            .position(id_or_prefix)
            .ok_or_else(|| StoreError::NotFound(id_or_prefix.to_string()))?;
        let item = &mut self.items[idx];
        let id = item.id().clone();

        if item.mark_removed() {
            Ok(RemovalOutcome::Removed(id))
        } else {
            Ok(RemovalOutcome::AlreadyRemoved(id))
        }
    }

    pub fn all_items(&self) -> &[Item] {
        &self.items
    }

    pub fn active_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().filter(|item| item.is_active())
    }

    pub fn statistics(&self, today: NaiveDate) -> StoreStatistics {
        let active = self.active_items().count();
        StoreStatistics {
            total: self.items.len(),
            active,
            removed: self.items.len() - active,
            found_today: self
                .active_items()
                .filter(|item| item.details().date_found == today)
                .count(),
        }
    }

    fn position(&self, id_or_prefix: &str) -> Option<usize> {
        let needle = id_or_prefix.trim();
        if needle.is_empty() {
            return None;
        }
        self.items
            .iter()
            .position(|item| item.id().as_str() == needle)
            .or_else(|| {
                self.items
                    .iter()
                    .position(|item| item.id().as_str().starts_with(needle))
            })
    }

    /// Read a store file. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<(Self, LoadReport), StoreError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no storage file found, starting with an empty store");
                return Ok((Self::new(), LoadReport::default()));
            }
            Err(err) => return Err(StoreError::io(path, err)),
        };

        let (store, report) =
            Self::load_from_reader(BufReader::new(file)).map_err(|err| StoreError::io(path, err))?;
        info!(
            path = %path.display(),
            loaded = report.loaded,
            migrated = report.migrated,
            skipped = report.skipped,
            "loaded items from storage"
        );
        Ok((store, report))
    }

    /// Parse records line by line. Malformed lines are skipped with a
    /// warning; only a read failure aborts.
    pub fn load_from_reader<R: BufRead>(reader: R) -> io::Result<(Self, LoadReport)> {
        let mut store = Self::new();
        let mut report = LoadReport::default();

        for (idx, raw) in reader.split(b'\n').enumerate() {
            let mut raw = raw?;
            let line_number = idx + 1;
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            let line = match String::from_utf8(raw) {
                Ok(line) => line,
                Err(err) => {
                    warn!(line = line_number, error = %err, "skipping record with invalid utf-8");
                    report.skipped += 1;
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let decoded = match record::decode(&line) {
                Ok(decoded) => decoded,
                Err(err) => {
                    warn!(line = line_number, error = %err, "skipping malformed record");
                    report.skipped += 1;
                    continue;
                }
            };

            let id = decoded.item.id().clone();
            if decoded.shape == RecordShape::Legacy {
                info!(item = %id, "migrated legacy record with category Others");
                report.migrated += 1;
            }
            if let Some(category) = &decoded.unknown_category {
                warn!(item = %id, category = %category, "unknown category, stored as Others");
            }

            match store.append(decoded.item) {
                Ok(_) => report.loaded += 1,
                Err(err) => {
                    warn!(line = line_number, error = %err, "skipping duplicate record");
                    report.skipped += 1;
                }
            }
        }

        Ok((store, report))
    }

    /// Write the full collection to `path`, first copying any existing file
    /// to `backup`. A failed backup is logged and does not stop the save.
    pub fn save(&self, path: &Path, backup: &Path) -> Result<(), StoreError> {
        if path.exists() {
            if let Err(err) = fs::copy(path, backup) {
                warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %err,
                    "could not create backup before saving"
                );
            }
        }

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }

        let staging = staging_path(path);
        let written = self
            .write_snapshot(&staging)
            .map_err(|err| StoreError::io(&staging, err))
            .and_then(|()| fs::rename(&staging, path).map_err(|err| StoreError::io(path, err)));
        if let Err(err) = written {
            let _ = fs::remove_file(&staging);
            return Err(err);
        }

        debug!(path = %path.display(), items = self.items.len(), "saved item snapshot");
        Ok(())
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for item in &self.items {
            writeln!(writer, "{}", record::encode(item))?;
        }
        writer.flush()
    }

    fn write_snapshot(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.get_ref().sync_all()
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
