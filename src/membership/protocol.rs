//! Peer Protocol Definitions
//!
//! JSON bodies exchanged between nodes for announcing, replying to
//! announces and liveness probing. Constants are the endpoint paths.

use super::types::PeerId;
use serde::{Deserialize, Serialize};

pub const ENDPOINT_ANNOUNCE: &str = "/announce";
pub const ENDPOINT_ANNOUNCE_REPLY: &str = "/announce/reply";
pub const ENDPOINT_HEARTBEAT: &str = "/heartbeat";
pub const ENDPOINT_NODES: &str = "/json/nodes";

/// Substring a heartbeat body must contain for the peer to count as alive.
pub const LIVENESS_MARKER: &str = "heartbeat";

/// Peer calls are plain HTTP; the TLS flag only shapes download URIs.
pub const PEER_SCHEME: &str = "http";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnounceRequest {
    pub node_id: PeerId,
    #[serde(default)]
    pub known_nodes: Vec<PeerId>,
    /// Where the receiver should push its merged peer list afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnounceResponse {
    #[serde(default)]
    pub known_nodes: Vec<PeerId>,
}

/// Body of the asynchronous push sent to an announcer's `response_url`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnownNodesPush {
    #[serde(default)]
    pub known_nodes: Vec<PeerId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    pub status: String,
    pub heartbeat: PeerId,
}

pub fn peer_url(peer: &str, endpoint: &str) -> String {
    format!("{}://{}{}", PEER_SCHEME, peer, endpoint)
}
