use std::sync::Arc;

use crate::{registry::peer_info::PeerInfo, types::Epoch};

/// Per-storeId peer population, seeded at a particular epoch. Replaced as
/// one unit on re-seed so a concurrent reader either sees the full old
/// list or the full new list, never a torn mix.
#[derive(Debug, Clone)]
pub struct PeerRegistryEntry {
    pub peers: Arc<[Arc<PeerInfo>]>,
    pub epoch: Epoch,
}

impl PeerRegistryEntry {
    pub fn new(peers: Vec<Arc<PeerInfo>>, epoch: Epoch) -> Self {
        Self {
            peers: peers.into(),
            epoch,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
