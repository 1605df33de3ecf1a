use super::types::{LocalSearchRequest, SearchResult, download_uri};
use crate::catalog::{CatalogStore, SearchQuery};
use crate::config::Protocol;
use crate::membership::MembershipService;
use crate::membership::types::PeerId;

use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub struct SearchCoordinator {
    catalog: Arc<dyn CatalogStore>,
    membership: Arc<MembershipService>,
    protocol: Protocol,
    /// Caps simultaneous outbound search calls; `None` leaves the fan-out unbounded.
    fanout_limit: Option<Arc<Semaphore>>,
}

impl SearchCoordinator {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        membership: Arc<MembershipService>,
        protocol: Protocol,
        fanout_limit: Option<usize>,
    ) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            membership,
            protocol,
            fanout_limit: fanout_limit.map(|limit| Arc::new(Semaphore::new(limit))),
        })
    }

    /// Queries this node's catalog only.
    pub fn local_search(&self, query: &SearchQuery) -> Vec<SearchResult> {
        let node_id = self.membership.node_id();
        let mut results: Vec<SearchResult> = self
            .catalog
            .query(query)
            .into_iter()
            .map(|entry| SearchResult::from_entry(entry, node_id, self.protocol))
            .collect();
        rank(&mut results);
        results
    }

    /// Queries the local catalog, then every known peer in parallel, and
    /// returns the merged list ranked by popularity.
    ///
    /// A peer that errors or times out contributes nothing.
    pub async fn search(&self, query: &SearchQuery) -> Vec<SearchResult> {
        let mut results = self.local_search(query);
        let local_count = results.len();

        let node_id = self.membership.node_id().to_string();
        let peers: Vec<PeerId> = self
            .membership
            .known_peers()
            .await
            .into_iter()
            .filter(|peer| *peer != node_id)
            .collect();

        let req = LocalSearchRequest::from(query);
        let mut calls = JoinSet::new();
        for peer in peers {
            let client = self.membership.client().clone();
            let req = req.clone();
            let limit = self.fanout_limit.clone();
            calls.spawn(async move {
                let _permit = match limit {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let outcome = client.local_search(&peer, &req).await;
                (peer, outcome)
            });
        }

        while let Some(joined) = calls.join_next().await {
            match joined {
                Ok((peer, Ok(remote))) => {
                    tracing::debug!("{} result(s) from {}", remote.len(), peer);
                    results.extend(
                        remote
                            .into_iter()
                            .map(|result| stamp_origin(result, &peer, self.protocol)),
                    );
                }
                Ok((peer, Err(e))) => {
                    tracing::warn!("Remote search on {} failed: {}", peer, e);
                }
                Err(e) => tracing::error!("Remote search task failed: {}", e),
            }
        }

        tracing::info!(
            "Search '{}' returned {} local and {} remote result(s)",
            query.term,
            local_count,
            results.len() - local_count
        );

        rank(&mut results);
        results
    }
}

/// Attributes a remote result to the peer that was dialed and rebuilds
/// its download link from that peer.
fn stamp_origin(mut result: SearchResult, peer: &str, protocol: Protocol) -> SearchResult {
    result.origin_peer = peer.to_string();
    result.download_uri = download_uri(protocol, peer, &result.fingerprint);
    result
}

/// Most popular first; ties broken by origin, name, fingerprint, then path.
pub fn rank(results: &mut [SearchResult]) {
    results.sort_by(compare);
}

fn compare(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.popularity
        .cmp(&a.popularity)
        .then_with(|| a.origin_peer.cmp(&b.origin_peer))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.fingerprint.cmp(&b.fingerprint))
        .then_with(|| a.path.cmp(&b.path))
}
