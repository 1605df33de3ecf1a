//! Catalog Module
//!
//! The node's local, content-addressed record of indexed files.
//!
//! ## Core Concepts
//! - **Fingerprint key**: every entry is keyed by the content hash of the file, so two
//!   paths with identical bytes collapse into one entry (first writer wins).
//! - **Append-only**: entries are never rewritten or pruned by the indexer; only the
//!   popularity counter moves.
//! - **Substitutable storage**: `CatalogStore` is the contract; `MemoryCatalog` is the
//!   shipped engine, with an optional JSON snapshot for durability across restarts.

pub mod memory;
pub mod store;
pub mod types;

pub use memory::MemoryCatalog;
pub use store::CatalogStore;
pub use types::{CatalogEntry, SearchMode, SearchQuery};
