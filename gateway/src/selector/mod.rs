pub mod policy;

use std::sync::Arc;

use rand::Rng;
use rustc_hash::FxHashSet;

use crate::{
    config::selector::SelectorConfig,
    error::internal::InternalError,
    oracle::{EpochClient, HeadProbe, PeerSampler},
    registry::{PeerInfo, PeerRegistry},
};

#[derive(Debug, Clone)]
pub struct Selection {
    pub peer: Arc<PeerInfo>,
    /// Whether the peer was validated against the key, as opposed to the
    /// root-hash-only fallback (§4.3 key-aware fallback).
    pub matched_key: bool,
}

/// Chooses and validates a peer for a store/root-hash, consulting the
/// registry for the current candidate population and the head probe for
/// per-candidate validation.
pub struct PeerSelector<O, H> {
    registry: Arc<PeerRegistry<O>>,
    head_probe: Arc<H>,
    config: SelectorConfig,
}

impl<O, H> PeerSelector<O, H>
where
    O: EpochClient + PeerSampler + Send + Sync + 'static,
    H: HeadProbe,
{
    pub fn new(registry: Arc<PeerRegistry<O>>, head_probe: Arc<H>, config: SelectorConfig) -> Self {
        Self { registry, head_probe, config }
    }

    /// Runs `RefreshIfNeeded`/`PeriodicRefresh` then the blended
    /// selection + validation loop (§4.2, §4.3), returning the first
    /// validated peer or `None` if the candidate population is exhausted.
    pub async fn select(
        &self,
        store_id: &str,
        root_hash: &str,
        key: Option<&str>,
        rng: &mut impl Rng,
    ) -> Result<Option<Selection>, InternalError> {
        self.registry.refresh_if_needed(store_id).await;
        self.registry.ensure_periodic_refresh(store_id).await;

        let Some(entry) = self.registry.get(store_id).await else {
            return Ok(None);
        };
        if entry.is_empty() {
            return Ok(None);
        }

        let candidates: Vec<Arc<PeerInfo>> = entry
            .peers
            .iter()
            .filter(|peer| !self.registry.offline.is_blacklisted(peer.ip()))
            .cloned()
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }

        if let Some(key) = key {
            if let Some(peer) = self
                .validate_loop(&candidates, store_id, root_hash, Some(key), rng)
                .await?
            {
                return Ok(Some(Selection { peer, matched_key: true }));
            }
        }

        let peer = self
            .validate_loop(&candidates, store_id, root_hash, None, rng)
            .await?;
        Ok(peer.map(|peer| Selection { peer, matched_key: false }))
    }

    /// Candidate loop (§4.3): select via the blended policy, validate via
    /// the head probe, and retry against untried candidates until either
    /// a validated peer is found or every candidate has been tried.
    async fn validate_loop(
        &self,
        candidates: &[Arc<PeerInfo>],
        store_id: &str,
        root_hash: &str,
        key: Option<&str>,
        rng: &mut impl Rng,
    ) -> Result<Option<Arc<PeerInfo>>, InternalError> {
        let mut tried: FxHashSet<String> = FxHashSet::default();

        while tried.len() < candidates.len() {
            let untried: Vec<Arc<PeerInfo>> = candidates
                .iter()
                .filter(|peer| !tried.contains(peer.ip()))
                .cloned()
                .collect();

            let peer = policy::blended_pick(
                &untried,
                &self.registry.active_connections,
                self.config.override_probability,
                rng,
            );

            let valid = self.validate(&peer, store_id, root_hash, key).await?;
            if valid {
                return Ok(Some(peer));
            }
            tried.insert(peer.ip().to_string());
        }

        Ok(None)
    }

    /// `Validate(peer, storeId, rootHash, key?)` (§4.3). Transport errors
    /// and timeouts are folded into `false` by the head probe client
    /// itself rather than propagated, matching "any timeout, transport
    /// error, or header mismatch -> false".
    async fn validate(
        &self,
        peer: &PeerInfo,
        store_id: &str,
        root_hash: &str,
        key: Option<&str>,
    ) -> Result<bool, InternalError> {
        match key {
            Some(key) => self.head_probe.head_key(peer.ip(), store_id, root_hash, key).await,
            None => self.head_probe.head_store(peer.ip(), store_id, root_hash).await,
        }
    }
}
