//! Search Service Module
//!
//! Answers queries from the local catalog and, for global searches, from
//! every known peer.
//!
//! ## Overview
//! A global search computes local results first, then posts the same query to each
//! peer's `/localsearch` endpoint concurrently. Every call has its own timeout and a
//! failing peer simply contributes nothing. The merged list is ordered by popularity,
//! with a fixed tie-break so identical inputs always produce identical output.
//!
//! ## Submodules
//! - **`engine`**: the coordinator, fan-out and ranking.
//! - **`handlers`**: HTTP request handlers for the Axum web server.
//! - **`types`**: results and request DTOs.

pub mod engine;
pub mod handlers;
pub mod types;

pub use engine::SearchCoordinator;

#[cfg(test)]
mod tests;
