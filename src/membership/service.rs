use anyhow::Result;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::client::PeerClient;
use super::protocol::{AnnounceRequest, KnownNodesPush};
use super::types::{AnnounceReport, MembershipState, PeerId};

/// Owns this node's view of the mesh.
///
/// Other components never see the peer sets directly: reads return a
/// snapshot and writes go through methods that take the one state lock.
pub struct MembershipService {
    node_id: PeerId,
    state: Mutex<MembershipState>,
    client: PeerClient,
}

impl MembershipService {
    pub fn new(node_id: impl Into<PeerId>, seeds: Vec<PeerId>, client: PeerClient) -> Arc<Self> {
        let node_id = node_id.into();
        let mut state = MembershipState::default();
        for seed in seeds {
            if is_admissible(&node_id, &seed) {
                state.known.insert(seed);
            }
        }

        if !state.known.is_empty() {
            info!("Starting with {} seed peer(s)", state.known.len());
        }

        Arc::new(Self {
            node_id,
            state: Mutex::new(state),
            client,
        })
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn client(&self) -> &PeerClient {
        &self.client
    }

    /// Sorted copy of `known_peers`.
    pub async fn known_peers(&self) -> Vec<PeerId> {
        self.state.lock().await.known.iter().cloned().collect()
    }

    pub async fn announced_peers(&self) -> Vec<PeerId> {
        self.state.lock().await.announced.iter().cloned().collect()
    }

    pub async fn is_known(&self, peer: &str) -> bool {
        self.state.lock().await.known.contains(peer)
    }

    /// Adds peers to `known_peers`, returning how many were new.
    ///
    /// Our own id and blank ids are ignored.
    pub async fn merge<I>(&self, peers: I) -> usize
    where
        I: IntoIterator<Item = PeerId>,
    {
        let mut state = self.state.lock().await;
        let mut added = 0;
        for peer in peers {
            if is_admissible(&self.node_id, &peer) && state.known.insert(peer.clone()) {
                info!("Discovered new peer: {}", peer);
                added += 1;
            }
        }
        added
    }

    /// Removes all given peers under a single lock acquisition.
    pub async fn remove_peers(&self, peers: &BTreeSet<PeerId>) {
        if peers.is_empty() {
            return;
        }
        let mut state = self.state.lock().await;
        for peer in peers {
            state.known.remove(peer);
        }
        info!("Known peers now: {}", state.known.len());
    }

    /// Seeds `known_peers` from a URL serving a JSON array of peer ids.
    pub async fn bootstrap(&self, url: &str) -> Result<usize> {
        let peers = self.client.fetch_peer_list(url).await?;
        let added = self.merge(peers).await;
        info!("Bootstrap list from {} added {} peer(s)", url, added);
        Ok(added)
    }

    /// Pushes our id and peer list to every known peer not yet announced to.
    ///
    /// Peers learned from replies are announced to in the same cycle. A peer
    /// that exhausts its retries is skipped for the rest of the cycle but stays
    /// known.
    pub async fn announce_cycle(&self) -> AnnounceReport {
        info!("Running announce cycle...");
        self.state.lock().await.announced.clear();

        let mut report = AnnounceReport::default();
        let mut attempted: HashSet<PeerId> = HashSet::new();

        while let Some(peer) = self.next_unannounced(&attempted).await {
            attempted.insert(peer.clone());

            let req = AnnounceRequest {
                node_id: self.node_id.clone(),
                known_nodes: self.known_peers().await,
                response_url: None,
            };

            match self.client.announce(&peer, &req).await {
                Ok(resp) => {
                    report.discovered += self.merge(resp.known_nodes).await;
                    self.state.lock().await.announced.insert(peer.clone());
                    report.announced.push(peer);
                }
                Err(e) => {
                    tracing::warn!("Giving up on announcing to {} this cycle: {}", peer, e);
                    report.failed.push(peer);
                }
            }
        }

        if report.discovered == 0 {
            info!("No new peers discovered this cycle");
        }
        info!(
            "Announce cycle done: {} announced, {} failed, {} discovered",
            report.announced.len(),
            report.failed.len(),
            report.discovered
        );

        report
    }

    async fn next_unannounced(&self, attempted: &HashSet<PeerId>) -> Option<PeerId> {
        let state = self.state.lock().await;
        state
            .known
            .iter()
            .find(|peer| !state.announced.contains(*peer) && !attempted.contains(*peer))
            .cloned()
    }

    /// Incorporates an incoming announce and returns the merged peer list.
    ///
    /// With a `response_url`, the merged list is also pushed there from a
    /// detached task whose failure is only logged.
    pub async fn handle_announcement(self: &Arc<Self>, req: AnnounceRequest) -> Vec<PeerId> {
        info!("Announce received from {}", req.node_id);

        let mut incoming = req.known_nodes;
        incoming.push(req.node_id);
        self.merge(incoming).await;

        let known = self.known_peers().await;

        if let Some(url) = req.response_url.filter(|url| !url.trim().is_empty()) {
            let client = self.client.clone();
            let push = KnownNodesPush {
                known_nodes: known.clone(),
            };
            tokio::spawn(async move {
                if let Err(e) = client.push_known_nodes(&url, &push).await {
                    tracing::warn!("Failed to push known peers to {}: {}", url, e);
                }
            });
        }

        known
    }
}

fn is_admissible(node_id: &str, peer: &str) -> bool {
    !peer.trim().is_empty() && peer != node_id
}
