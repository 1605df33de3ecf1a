use super::protocol::{AnnounceRequest, AnnounceResponse, HeartbeatResponse, KnownNodesPush};
use super::service::MembershipService;
use super::types::PeerId;
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;

pub async fn handle_announce(
    Extension(membership): Extension<Arc<MembershipService>>,
    Json(req): Json<AnnounceRequest>,
) -> (StatusCode, Json<AnnounceResponse>) {
    if req.node_id.trim().is_empty() {
        tracing::warn!("Rejected announce without node_id");
        return (StatusCode::BAD_REQUEST, Json(AnnounceResponse::default()));
    }

    let known_nodes = membership.handle_announcement(req).await;
    (StatusCode::OK, Json(AnnounceResponse { known_nodes }))
}

pub async fn handle_announce_reply(
    Extension(membership): Extension<Arc<MembershipService>>,
    Json(push): Json<KnownNodesPush>,
) -> StatusCode {
    let added = membership.merge(push.known_nodes).await;
    tracing::debug!("Announce reply merged {} new peer(s)", added);
    StatusCode::OK
}

pub async fn handle_heartbeat(
    Extension(membership): Extension<Arc<MembershipService>>,
) -> Json<HeartbeatResponse> {
    Json(HeartbeatResponse {
        status: "alive".to_string(),
        heartbeat: membership.node_id().to_string(),
    })
}

pub async fn handle_nodes(
    Extension(membership): Extension<Arc<MembershipService>>,
) -> Json<Vec<PeerId>> {
    Json(membership.known_peers().await)
}
