use super::client::PeerClient;
use super::service::MembershipService;
use super::types::PeerId;

use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Heartbeat sweeper. Evicts peers whose liveness probe fails.
pub struct FailureDetector {
    membership: Arc<MembershipService>,
    client: PeerClient,
    connectivity_url: String,
}

impl FailureDetector {
    pub fn new(membership: Arc<MembershipService>, connectivity_url: impl Into<String>) -> Arc<Self> {
        let client = membership.client().clone();
        Arc::new(Self {
            membership,
            client,
            connectivity_url: connectivity_url.into(),
        })
    }

    /// Probes every known peer concurrently and evicts the failures in one batch.
    ///
    /// If our own connectivity probe fails nothing is evicted, since a dead
    /// peer and a dead uplink look the same from here.
    pub async fn check_all(&self) -> BTreeSet<PeerId> {
        tracing::info!("Running heartbeat checker...");

        let peers = self.membership.known_peers().await;
        if peers.is_empty() {
            return BTreeSet::new();
        }

        if !self.client.check_connectivity(&self.connectivity_url).await {
            tracing::error!("No internet connection, cannot perform heartbeat check");
            return BTreeSet::new();
        }

        let mut probes = JoinSet::new();
        for peer in peers {
            let client = self.client.clone();
            probes.spawn(async move {
                let alive = client.heartbeat(&peer).await;
                (peer, alive)
            });
        }

        let mut evicted = BTreeSet::new();
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok((peer, true)) => tracing::debug!("Peer {} is alive", peer),
                Ok((peer, false)) => {
                    tracing::info!("Peer {} is unreachable or invalid, evicting", peer);
                    evicted.insert(peer);
                }
                Err(e) => tracing::error!("Heartbeat probe task failed: {}", e),
            }
        }

        self.membership.remove_peers(&evicted).await;
        evicted
    }
}
