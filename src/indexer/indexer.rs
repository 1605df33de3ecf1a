//! Directory Indexer
//!
//! Walks a directory tree, fingerprints each regular file and adds the ones
//! the catalog has not seen yet.
//!
//! ## Guarantees
//! - **Idempotent**: re-running over unchanged files adds nothing.
//! - **Deduplicating**: identical bytes under two paths produce one entry; the path
//!   reached first in traversal order (file-name order) is the one kept.
//! - **Non-blocking for readers**: the walk runs on a blocking thread and writes one
//!   entry at a time, so searches keep running against the catalog meanwhile.
//! - **Add-only**: entries for files that disappeared from disk are left in place.

use super::classify::classify;
use super::exclusion::{EXCLUDE_FILE_NAME, ExclusionRules};
use super::fingerprint::fingerprint_file;
use super::types::IndexSummary;
use crate::catalog::{CatalogEntry, CatalogStore};
use crate::error::IndexError;

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

pub struct Indexer {
    catalog: Arc<dyn CatalogStore>,
    /// Root used by scheduled runs.
    directory: Option<PathBuf>,
}

impl Indexer {
    pub fn new(catalog: Arc<dyn CatalogStore>, directory: Option<PathBuf>) -> Arc<Self> {
        Arc::new(Self { catalog, directory })
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Indexes the configured directory.
    ///
    /// Fails with [`IndexError::DirectoryUnset`] when none is configured; the
    /// failure is limited to this run.
    pub async fn index_configured(&self) -> Result<IndexSummary, IndexError> {
        let root = self.directory.clone().ok_or(IndexError::DirectoryUnset)?;
        self.index(root).await
    }

    /// Resolves a path named by a manual trigger.
    ///
    /// Only the configured directory or a directory beneath it may be
    /// indexed on request; symlinks and `..` are resolved before the check.
    pub fn resolve_requested(&self, requested: &str) -> Result<PathBuf, IndexError> {
        let root = self.directory.as_deref().ok_or(IndexError::DirectoryUnset)?;
        let root = root
            .canonicalize()
            .map_err(|_| IndexError::NotADirectory(root.to_path_buf()))?;
        let path = Path::new(requested)
            .canonicalize()
            .map_err(|_| IndexError::NotADirectory(PathBuf::from(requested)))?;

        if !path.starts_with(&root) {
            return Err(IndexError::OutsideRoot(path));
        }
        Ok(path)
    }

    /// Indexes `root` and persists the catalog if anything was added.
    pub async fn index(&self, root: impl AsRef<Path>) -> Result<IndexSummary, IndexError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(IndexError::NotADirectory(root));
        }

        tracing::info!("Starting indexing of {}", root.display());

        let catalog = self.catalog.clone();
        let walk_root = root.clone();
        let summary =
            tokio::task::spawn_blocking(move || index_tree(catalog.as_ref(), &walk_root)).await?;

        if summary.indexed > 0
            && let Err(e) = self.catalog.flush()
        {
            tracing::error!("Failed to persist catalog after indexing: {}", e);
        }

        tracing::info!(
            "Indexing of {} complete: {} new, {} duplicate, {} excluded, {} failed",
            root.display(),
            summary.indexed,
            summary.duplicates,
            summary.excluded,
            summary.failed
        );

        Ok(summary)
    }
}

/// The synchronous walk. Exclusion rules are read fresh on every call.
pub(crate) fn index_tree(catalog: &dyn CatalogStore, root: &Path) -> IndexSummary {
    let rules = ExclusionRules::load(root);
    let rule_file = root.join(EXCLUDE_FILE_NAME);
    let mut summary = IndexSummary::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable directory entry: {}", e);
                summary.failed += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() || entry.path() == rule_file {
            continue;
        }

        let path = entry.path();
        let path_str = path.to_string_lossy();

        if rules.is_excluded(&path_str) {
            summary.excluded += 1;
            continue;
        }

        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                tracing::warn!("Skipping {}: cannot stat: {}", path_str, e);
                summary.failed += 1;
                continue;
            }
        };

        let fingerprint = match fingerprint_file(path) {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                tracing::error!("Skipping {}: cannot hash: {}", path_str, e);
                summary.failed += 1;
                continue;
            }
        };

        if catalog.find_by_fingerprint(&fingerprint).is_some() {
            tracing::debug!("Already indexed: {} ({})", path_str, fingerprint);
            summary.duplicates += 1;
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let category = classify(&path_str, &extension);

        let inserted = catalog.upsert(CatalogEntry {
            name: name.clone(),
            path: path_str.to_string(),
            fingerprint,
            size,
            category: category.to_string(),
            popularity: 0,
            indexed_at: Utc::now(),
        });

        if inserted {
            tracing::info!("Indexed {} as {}", name, category);
            summary.indexed += 1;
        } else {
            // Another run inserted the same content between lookup and insert
            summary.duplicates += 1;
        }
    }

    summary
}
