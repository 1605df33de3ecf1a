//! Task Scheduler Module
//!
//! Drives the node's recurring work: the daily index run, the announce cycle
//! and the heartbeat sweep, each on its own schedule, plus one immediate run
//! of each at startup so a fresh node is useful right away.
//!
//! ## Submodules
//! - **`registry`**: maps job names to async closures.
//! - **`scheduler`**: the single-threaded polling loop.
//! - **`types`**: schedules and next-run arithmetic.

pub mod registry;
pub mod scheduler;
pub mod types;

pub use registry::JobRegistry;
pub use scheduler::Scheduler;
pub use types::Schedule;
