//! Membership & Discovery Module
//!
//! Keeps this node's view of the mesh: the set of peers believed reachable
//! (`known_peers`) and the peers already announced to in the current cycle.
//!
//! ## Core Mechanisms
//! - **Announce (gossip push)**: each cycle sends our id and peer list to every known
//!   peer and unions the list each one echoes back. Failed announces are retried with
//!   doubling backoff, then skipped until the next cycle.
//! - **Failure Detection**: a heartbeat sweep probes all peers in parallel and evicts
//!   the ones that fail, unless our own connectivity check fails first.
//! - **Bootstrap**: an optional URL serving a JSON peer list seeds the set at startup.
//!
//! Membership is best-effort and eventually consistent; there is no agreement protocol.

pub mod client;
pub mod detector;
pub mod handlers;
pub mod protocol;
pub mod service;
pub mod types;

pub use client::PeerClient;
pub use detector::FailureDetector;
pub use service::MembershipService;
