use super::store::CatalogStore;
use super::types::{CatalogEntry, SearchMode, SearchQuery};
use crate::error::CatalogError;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory catalog keyed by fingerprint, optionally backed by a JSON
/// snapshot on disk.
///
/// `DashMap` shards its locks, so lookups and inserts on different
/// fingerprints proceed in parallel while two inserts on the same
/// fingerprint serialize on one shard.
pub struct MemoryCatalog {
    entries: DashMap<String, CatalogEntry>,
    snapshot_path: Option<PathBuf>,
    /// Serializes snapshot writes; they share one temp file.
    flush_lock: Mutex<()>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            snapshot_path: None,
            flush_lock: Mutex::new(()),
        }
    }

    /// Opens a catalog persisted at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let catalog = Self {
            entries: DashMap::new(),
            snapshot_path: Some(path.clone()),
            flush_lock: Mutex::new(()),
        };

        if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let entries: Vec<CatalogEntry> = serde_json::from_str(&raw)?;
            for entry in entries {
                catalog.upsert(entry);
            }
            tracing::info!(
                "Loaded {} catalog entries from {}",
                catalog.entries.len(),
                path.display()
            );
        } else {
            tracing::info!("No catalog snapshot at {}, starting empty", path.display());
        }

        Ok(catalog)
    }

    /// All entries, ordered by fingerprint.
    pub fn snapshot(&self) -> Vec<CatalogEntry> {
        let mut entries: Vec<CatalogEntry> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));
        entries
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore for MemoryCatalog {
    fn upsert(&self, entry: CatalogEntry) -> bool {
        match self.entries.entry(entry.fingerprint.clone()) {
            Entry::Occupied(existing) => {
                tracing::debug!(
                    "Fingerprint {} already catalogued as {}, skipping {}",
                    entry.fingerprint,
                    existing.get().path,
                    entry.path
                );
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    fn find_by_fingerprint(&self, fingerprint: &str) -> Option<CatalogEntry> {
        self.entries
            .get(fingerprint)
            .map(|entry| entry.value().clone())
    }

    fn query(&self, query: &SearchQuery) -> Vec<CatalogEntry> {
        if query.mode == SearchMode::Hash {
            return self
                .find_by_fingerprint(&query.term)
                .filter(|entry| query.matches(entry))
                .into_iter()
                .collect();
        }

        self.entries
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn increment_popularity(&self, fingerprint: &str) -> Option<u64> {
        let mut entry = self.entries.get_mut(fingerprint)?;
        entry.popularity += 1;
        Some(entry.popularity)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn total_size(&self) -> u64 {
        self.entries.iter().map(|entry| entry.value().size).sum()
    }

    /// Writes the snapshot file, if this catalog has one.
    ///
    /// The file is replaced atomically so a crash mid-write leaves the
    /// previous snapshot intact.
    fn flush(&self) -> Result<(), CatalogError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let _guard = self
            .flush_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Taken under the lock so the last writer also writes the newest state
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        let tmp = tmp_path(path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;

        tracing::debug!(
            "Flushed {} catalog entries to {}",
            self.entries.len(),
            path.display()
        );
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
