//! Outbound peer calls.
//!
//! Every request carries the same per-call timeout; that timeout is the only
//! cancellation mechanism. Only announces are retried.

use super::protocol::{
    AnnounceRequest, AnnounceResponse, ENDPOINT_ANNOUNCE, ENDPOINT_HEARTBEAT, KnownNodesPush,
    LIVENESS_MARKER, peer_url,
};
use super::types::PeerId;
use crate::search::types::{ENDPOINT_LOCAL_SEARCH, LocalSearchRequest, SearchResult};

use anyhow::Result;
use reqwest::StatusCode;
use std::time::Duration;

pub const ANNOUNCE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct PeerClient {
    http_client: reqwest::Client,
    timeout: Duration,
    /// Delay before the second announce attempt; doubled before each later one.
    backoff: Duration,
}

impl PeerClient {
    pub fn new(timeout: Duration, backoff: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            timeout,
            backoff,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Announces to `peer`, retrying with exponential backoff.
    pub async fn announce(&self, peer: &str, req: &AnnounceRequest) -> Result<AnnounceResponse> {
        let url = peer_url(peer, ENDPOINT_ANNOUNCE);
        let mut delay = self.backoff;

        for attempt in 1..=ANNOUNCE_ATTEMPTS {
            match self.try_announce(&url, req).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    tracing::warn!(
                        "Announce to {} failed (attempt {}/{}): {}",
                        peer,
                        attempt,
                        ANNOUNCE_ATTEMPTS,
                        e
                    );
                    if attempt == ANNOUNCE_ATTEMPTS {
                        return Err(e);
                    }
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }

        Err(anyhow::anyhow!("Retry attempts exhausted"))
    }

    async fn try_announce(&self, url: &str, req: &AnnounceRequest) -> Result<AnnounceResponse> {
        let resp = self
            .http_client
            .post(url)
            .json(req)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.json::<AnnounceResponse>().await?)
    }

    /// True when `peer` answers 200 with the liveness marker in its body.
    pub async fn heartbeat(&self, peer: &str) -> bool {
        let url = peer_url(peer, ENDPOINT_HEARTBEAT);
        let resp = match self.http_client.get(&url).timeout(self.timeout).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!("Heartbeat to {} failed: {}", peer, e);
                return false;
            }
        };

        if resp.status() != StatusCode::OK {
            tracing::debug!("Heartbeat to {} returned {}", peer, resp.status());
            return false;
        }

        match resp.text().await {
            Ok(body) => body.contains(LIVENESS_MARKER),
            Err(e) => {
                tracing::debug!("Heartbeat body from {} unreadable: {}", peer, e);
                false
            }
        }
    }

    /// True when `url` answers 200. Used to tell "peer down" from "we are offline".
    pub async fn check_connectivity(&self, url: &str) -> bool {
        match self.http_client.get(url).timeout(self.timeout).send().await {
            Ok(resp) => resp.status() == StatusCode::OK,
            Err(e) => {
                tracing::debug!("Connectivity probe to {} failed: {}", url, e);
                false
            }
        }
    }

    pub async fn local_search(
        &self,
        peer: &str,
        req: &LocalSearchRequest,
    ) -> Result<Vec<SearchResult>> {
        let resp = self
            .http_client
            .post(peer_url(peer, ENDPOINT_LOCAL_SEARCH))
            .json(req)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.json::<Vec<SearchResult>>().await?)
    }

    pub async fn push_known_nodes(&self, url: &str, push: &KnownNodesPush) -> Result<()> {
        self.http_client
            .post(url)
            .json(push)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Fetches a JSON array of peer ids.
    pub async fn fetch_peer_list(&self, url: &str) -> Result<Vec<PeerId>> {
        let resp = self
            .http_client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.json::<Vec<PeerId>>().await?)
    }
}
