use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A node's address as `host:port`. Compared as an exact string.
pub type PeerId = String;

/// The two peer sets owned by [`MembershipService`](super::service::MembershipService).
///
/// Both live behind one lock so readers never observe half of an update.
/// `announced` may still name peers the failure detector already evicted
/// from `known`; those entries only suppress re-announcing this cycle.
#[derive(Debug, Default)]
pub(crate) struct MembershipState {
    pub known: BTreeSet<PeerId>,
    pub announced: BTreeSet<PeerId>,
}

/// Outcome of one announce cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnounceReport {
    /// Peers that accepted our announce, in the order they were contacted.
    pub announced: Vec<PeerId>,
    /// Peers that exhausted every retry. They stay known.
    pub failed: Vec<PeerId>,
    /// Peers learned from replies during the cycle.
    pub discovered: usize,
}
