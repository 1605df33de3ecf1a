//! Odin Node Library
//!
//! The modules that make up one node of the file-search mesh. The binary
//! (`main.rs`) parses configuration, wires these together and serves them.
//!
//! ## Architecture Modules
//! - **`catalog`**: the local fingerprint-keyed store of indexed files.
//! - **`indexer`**: walks a directory, fingerprints and classifies files into the catalog.
//! - **`membership`**: known-peer set, announce (gossip) protocol and heartbeat failure detection.
//! - **`search`**: local search and the concurrent fan-out to every known peer.
//! - **`scheduler`**: runs indexing, announcing and heartbeat sweeps on their own schedules.
//! - **`config`** / **`error`**: the startup configuration record and error types.
//! - **`routes`**: component wiring and the HTTP router.

pub mod catalog;
pub mod config;
pub mod error;
pub mod indexer;
pub mod membership;
pub mod routes;
pub mod scheduler;
pub mod search;
