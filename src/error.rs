//! Error Types
//!
//! Typed failures for the parts of the node where callers need to tell
//! one failure from another. Network plumbing and startup use `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a single indexing run.
///
/// Per-file problems (unreadable file, bad exclusion rule) are not errors:
/// they are logged and the run continues.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("indexing directory is not configured")]
    DirectoryUnset,

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("{0} is outside the indexing directory")]
    OutsideRoot(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("indexing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Startup configuration that failed validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("node id must not be empty")]
    EmptyNodeId,

    #[error("index hour must be within 0..=23, got {0}")]
    InvalidIndexHour(u32),

    #[error("{name} must be greater than zero")]
    ZeroInterval { name: &'static str },

    #[error("{name} is too large")]
    IntervalTooLarge { name: &'static str },

    #[error("invalid bind address: {0}")]
    InvalidBind(String),
}

/// Catalog snapshot load/save failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog snapshot is malformed: {0}")]
    Json(#[from] serde_json::Error),
}
