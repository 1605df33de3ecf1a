//! Content Indexer Module
//!
//! Turns a directory of files into catalog entries.
//!
//! ## Workflow
//! 1. **Rules**: loads `.exclude_patterns` from the root of the indexed directory.
//! 2. **Walk**: visits every regular file under the root in file-name order.
//! 3. **Fingerprint**: streams each file through BLAKE3 (128-bit, hex).
//! 4. **Classify**: assigns a category label, only for fingerprints not yet catalogued.
//! 5. **Store**: inserts the entry; an existing fingerprint is skipped, never updated.
//!
//! ## Submodules
//! - **`classify`**: the pure path/extension categorisation.
//! - **`exclusion`**: the per-run exclusion rule set.
//! - **`fingerprint`**: chunked content hashing.
//! - **`indexer`**: the walk itself.
//! - **`handlers`**: manual index trigger and catalog size endpoints.

pub mod classify;
pub mod exclusion;
pub mod fingerprint;
pub mod handlers;
pub mod indexer;
pub mod types;

pub use indexer::Indexer;
