//! HTTP Surface
//!
//! Builds every component of a node from its configuration and mounts
//! their handlers on one axum router.

use crate::catalog::CatalogStore;
use crate::config::NodeConfig;
use crate::indexer::Indexer;
use crate::indexer::handlers::{handle_total_file_size, handle_trigger_index};
use crate::membership::handlers::{
    handle_announce, handle_announce_reply, handle_heartbeat, handle_nodes,
};
use crate::membership::protocol::{
    ENDPOINT_ANNOUNCE, ENDPOINT_ANNOUNCE_REPLY, ENDPOINT_HEARTBEAT, ENDPOINT_NODES,
};
use crate::membership::{FailureDetector, MembershipService, PeerClient};
use crate::search::SearchCoordinator;
use crate::search::handlers::{
    handle_global_search, handle_hash_search, handle_json_global_search, handle_local_search,
};
use crate::search::types::{
    ENDPOINT_GLOBAL_SEARCH, ENDPOINT_HASH_SEARCH, ENDPOINT_JSON_GLOBAL_SEARCH,
    ENDPOINT_LOCAL_SEARCH,
};

use axum::routing::{get, post};
use axum::{Extension, Router};
use std::sync::Arc;

pub const ENDPOINT_INDEXER: &str = "/indexer";
pub const ENDPOINT_TOTAL_FILE_SIZE: &str = "/total_file_size";

/// The shared components of one running node.
#[derive(Clone)]
pub struct NodeContext {
    pub catalog: Arc<dyn CatalogStore>,
    pub indexer: Arc<Indexer>,
    pub membership: Arc<MembershipService>,
    pub detector: Arc<FailureDetector>,
    pub search: Arc<SearchCoordinator>,
}

impl NodeContext {
    pub fn build(config: &NodeConfig, catalog: Arc<dyn CatalogStore>) -> Self {
        let client = PeerClient::new(config.peer_timeout(), config.announce_backoff());
        let membership =
            MembershipService::new(config.node_id.clone(), config.seed_peers(), client);
        let detector = FailureDetector::new(membership.clone(), config.connectivity_url.clone());
        let indexer = Indexer::new(catalog.clone(), config.directory.clone());
        let search = SearchCoordinator::new(
            catalog.clone(),
            membership.clone(),
            config.protocol(),
            config.search_fanout_limit,
        );

        Self {
            catalog,
            indexer,
            membership,
            detector,
            search,
        }
    }
}

pub fn create_router(ctx: &NodeContext) -> Router {
    Router::new()
        .route(ENDPOINT_ANNOUNCE, post(handle_announce))
        .route(ENDPOINT_ANNOUNCE_REPLY, post(handle_announce_reply))
        .route(ENDPOINT_HEARTBEAT, get(handle_heartbeat))
        .route(ENDPOINT_NODES, get(handle_nodes))
        .route(ENDPOINT_LOCAL_SEARCH, post(handle_local_search))
        .route(ENDPOINT_GLOBAL_SEARCH, post(handle_global_search))
        .route(ENDPOINT_JSON_GLOBAL_SEARCH, post(handle_json_global_search))
        .route(ENDPOINT_HASH_SEARCH, get(handle_hash_search))
        .route(ENDPOINT_INDEXER, post(handle_trigger_index))
        .route(ENDPOINT_TOTAL_FILE_SIZE, get(handle_total_file_size))
        .layer(Extension(ctx.catalog.clone()))
        .layer(Extension(ctx.indexer.clone()))
        .layer(Extension(ctx.membership.clone()))
        .layer(Extension(ctx.search.clone()))
}
