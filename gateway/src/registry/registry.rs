use std::{sync::Arc, time::Duration};

use moka::future::Cache;
use rustc_hash::FxHashSet;
use tokio::sync::{Mutex, RwLock};

use crate::{
    oracle::{EpochClient, PeerSampler},
    registry::{active_connections::ActiveConnections, entry::PeerRegistryEntry, offline::OfflinePeersSet, peer_info::PeerInfo},
    types::Epoch,
};

/// Owns the per-store peer population, the process-wide epoch, the
/// blacklist, and the in-flight connection counters (§3, §4.2, §5). One
/// instance is shared across all request handlers via `AppState`.
pub struct PeerRegistry<O> {
    entries: Cache<String, Arc<PeerRegistryEntry>>,
    current_epoch: RwLock<Option<Epoch>>,
    timers_installed: Mutex<FxHashSet<String>>,
    pub active_connections: ActiveConnections,
    pub offline: OfflinePeersSet,
    oracle: Arc<O>,
    seed_size: usize,
    refresh_interval: Duration,
}

impl<O> PeerRegistry<O>
where
    O: EpochClient + PeerSampler + Send + Sync + 'static,
{
    pub fn new(
        oracle: Arc<O>,
        entry_ttl: Duration,
        offline_ttl: Duration,
        seed_size: usize,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            entries: Cache::builder().time_to_live(entry_ttl).build(),
            current_epoch: RwLock::new(None),
            timers_installed: Mutex::new(FxHashSet::default()),
            active_connections: ActiveConnections::new(),
            offline: OfflinePeersSet::new(offline_ttl),
            oracle,
            seed_size,
            refresh_interval,
        }
    }

    pub async fn get(&self, store_id: &str) -> Option<Arc<PeerRegistryEntry>> {
        self.entries.get(store_id).await
    }

    /// `Seed(storeId)` (§4.2). Swallows oracle failures: on error, leaves
    /// an existing entry stale rather than clobbering it, or installs an
    /// empty entry so selection deterministically reports `NoValidPeers`.
    pub async fn seed(&self, store_id: &str, epoch: Epoch) {
        match self.oracle.sample_current_epoch(store_id, self.seed_size).await {
            Ok(ips) => {
                let peers: Vec<Arc<PeerInfo>> =
                    ips.iter().map(|ip| Arc::new(PeerInfo::new(ip.clone()))).collect();
                for peer in &peers {
                    self.active_connections.reset(peer.ip());
                }
                let entry = Arc::new(PeerRegistryEntry::new(peers, epoch));
                self.entries.insert(store_id.to_string(), entry).await;
            }
            Err(error) => {
                tracing::warn!(store_id, error = %error, "peer oracle seed failed");
                if self.entries.get(store_id).await.is_none() {
                    self.entries
                        .insert(
                            store_id.to_string(),
                            Arc::new(PeerRegistryEntry::new(Vec::new(), epoch)),
                        )
                        .await;
                }
            }
        }
    }

    /// `RefreshIfNeeded(storeId)` (§4.2). `currentEpoch` is a single
    /// process-wide value: a refresh triggered by one store can cause a
    /// later request for a different store to also reseed. This is
    /// intentional (the epoch is network-wide, not per-store).
    pub async fn refresh_if_needed(&self, store_id: &str) {
        let fetched = match self.oracle.current_epoch().await {
            Ok(epoch) => epoch,
            Err(error) => {
                tracing::warn!(store_id, error = %error, "epoch clock lookup failed");
                return;
            }
        };

        let needs_refresh = {
            let current = self.current_epoch.read().await;
            current.is_none_or(|current| current != fetched) || self.entries.get(store_id).await.is_none()
        };

        if needs_refresh {
            *self.current_epoch.write().await = Some(fetched);
            self.seed(store_id, fetched).await;
        }
    }

    /// Installs the 30-minute periodic refresh timer for `store_id` at
    /// most once (§4.2, §8 invariant: "at most one periodic refresh timer
    /// per storeId").
    pub async fn ensure_periodic_refresh(self: &Arc<Self>, store_id: &str) {
        let mut installed = self.timers_installed.lock().await;
        if !installed.insert(store_id.to_string()) {
            return;
        }
        drop(installed);

        let registry = Arc::clone(self);
        let store_id = store_id.to_string();
        let interval = self.refresh_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                registry.refresh_if_needed(&store_id).await;
            }
        });
    }

    #[cfg(test)]
    async fn installed_timer_count(&self) -> usize {
        self.timers_installed.lock().await.len()
    }
}
