use super::types::{CatalogEntry, SearchQuery};
use crate::error::CatalogError;

/// The local catalog contract the indexer writes to and search reads from.
///
/// Implementations must keep `fingerprint` unique under concurrent
/// `upsert` calls: when two writers race on the same new fingerprint,
/// exactly one insert lands and the other is silently dropped.
pub trait CatalogStore: Send + Sync {
    /// Inserts `entry` unless its fingerprint is already present.
    ///
    /// Returns `true` when the entry was inserted.
    fn upsert(&self, entry: CatalogEntry) -> bool;

    fn find_by_fingerprint(&self, fingerprint: &str) -> Option<CatalogEntry>;

    /// Entries matching `query`, in no particular order.
    fn query(&self, query: &SearchQuery) -> Vec<CatalogEntry>;

    /// Bumps the download counter; used by the download-serving layer.
    fn increment_popularity(&self, fingerprint: &str) -> Option<u64>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of `size` over every entry.
    fn total_size(&self) -> u64;

    /// Persists the catalog, for engines that keep state in memory.
    fn flush(&self) -> Result<(), CatalogError> {
        Ok(())
    }
}
