//! Indexer Data Types
//!
//! The outcome of one indexing run and the DTOs of the indexing endpoints.

use serde::{Deserialize, Serialize};

/// Counters for one pass over a directory tree.
///
/// `indexed` is the number of entries newly added to the catalog; the
/// other counters explain why the remaining files were not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub indexed: usize,
    /// Files whose fingerprint was already catalogued.
    pub duplicates: usize,
    /// Files matched by an exclusion pattern.
    pub excluded: usize,
    /// Files that could not be read or hashed.
    pub failed: usize,
}

/// Body of `POST /indexer`. Without a path, the configured directory is indexed.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IndexRequest {
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub status: String,
    pub summary: Option<IndexSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TotalSizeResponse {
    pub total_file_size: u64,
}
