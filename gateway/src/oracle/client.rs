use std::future::Future;

use crate::{
    config::oracle::OracleConfig,
    error::internal::InternalError,
    oracle::models::{CoinInfoResponse, CurrentEpochResponse, SampleCurrentEpochResponse},
    types::Epoch,
};

/// `ServerCoin.getCurrentEpoch()` — returns the network-wide epoch/round
/// pair that drives registry refresh (§4.2).
pub trait EpochClient: Send + Sync {
    fn current_epoch(&self) -> impl Future<Output = Result<Epoch, InternalError>> + Send;
}

/// `ServerCoin.sampleCurrentEpoch(storeId, k)` — up to `k` candidate peer
/// IPs for a store in the current epoch.
pub trait PeerSampler: Send + Sync {
    fn sample_current_epoch(
        &self,
        store_id: &str,
        k: usize,
    ) -> impl Future<Output = Result<Vec<String>, InternalError>> + Send;
}

/// `DataStore.fetchCoinInfo(storeId)` — resolves a store's latest root hash.
pub trait CoinInfoClient: Send + Sync {
    fn fetch_coin_info(
        &self,
        store_id: &str,
    ) -> impl Future<Output = Result<String, InternalError>> + Send;
}

/// `DigPeer.contentServer.{headStore, headKey}` — the content head probe
/// consulted by the selector to validate a candidate peer (§4.3).
pub trait HeadProbe: Send + Sync {
    fn head_store(
        &self,
        peer_ip: &str,
        store_id: &str,
        root_hash: &str,
    ) -> impl Future<Output = Result<bool, InternalError>> + Send;

    fn head_key(
        &self,
        peer_ip: &str,
        store_id: &str,
        root_hash: &str,
        key: &str,
    ) -> impl Future<Output = Result<bool, InternalError>> + Send;
}

/// `reqwest`-backed implementation of all four consumed oracle/peer
/// contracts, sharing one client and timeout configuration.
#[derive(Debug, Clone)]
pub struct OracleClient {
    http: reqwest::Client,
    config: OracleConfig,
}

impl OracleClient {
    pub fn new(config: OracleConfig) -> Result<Self, InternalError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(InternalError::Oracle)?;
        Ok(Self { http, config })
    }

    /// Retries a fallible oracle call per `config.oracle.retry` (§10.1).
    /// Never used for the head probe, which already folds every failure
    /// into `Ok(false)` rather than an error (§4.3).
    async fn with_retry<T, F, Fut>(&self, mut op: F) -> Result<T, InternalError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, InternalError>>,
    {
        let delays = self.config.retry.delays();
        let mut attempts = delays.into_iter();
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => match attempts.next() {
                    Some(delay) => {
                        tracing::debug!(error = %error, delay_ms = delay.as_millis(), "retrying oracle call");
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(error),
                },
            }
        }
    }
}

impl EpochClient for OracleClient {
    async fn current_epoch(&self) -> Result<Epoch, InternalError> {
        self.with_retry(|| async {
            let url = format!("{}/epoch/current", self.config.base_url);
            let response: CurrentEpochResponse =
                self.http.get(url).send().await?.error_for_status()?.json().await?;
            Ok(Epoch::new(response.epoch, response.round))
        })
        .await
    }
}

impl PeerSampler for OracleClient {
    async fn sample_current_epoch(
        &self,
        store_id: &str,
        k: usize,
    ) -> Result<Vec<String>, InternalError> {
        self.with_retry(|| async {
            let url = format!(
                "{}/stores/{store_id}/peers?limit={k}",
                self.config.base_url
            );
            let response: SampleCurrentEpochResponse =
                self.http.get(url).send().await?.error_for_status()?.json().await?;
            Ok(response.peers)
        })
        .await
    }
}

impl CoinInfoClient for OracleClient {
    async fn fetch_coin_info(&self, store_id: &str) -> Result<String, InternalError> {
        self.with_retry(|| async {
            let url = format!("{}/stores/{store_id}/coin", self.config.base_url);
            let response: CoinInfoResponse =
                self.http.get(url).send().await?.error_for_status()?.json().await?;
            Ok(response.latest_store.metadata.root_hash.to_lowercase())
        })
        .await
    }
}

impl HeadProbe for OracleClient {
    async fn head_store(
        &self,
        peer_ip: &str,
        store_id: &str,
        root_hash: &str,
    ) -> Result<bool, InternalError> {
        let url = format!(
            "http://{peer_ip}:{}/chia.{store_id}.{root_hash}",
            self.config.peer_port
        );
        let response = self
            .http
            .head(url)
            .timeout(self.config.head_probe_timeout)
            .send()
            .await;
        let response = match response {
            Ok(response) => response,
            Err(_) => return Ok(false),
        };
        let has_root_hash = response
            .headers()
            .get("x-has-roothash")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == "true");
        Ok(has_root_hash)
    }

    async fn head_key(
        &self,
        peer_ip: &str,
        store_id: &str,
        root_hash: &str,
        key: &str,
    ) -> Result<bool, InternalError> {
        let url = format!(
            "http://{peer_ip}:{}/chia.{store_id}.{root_hash}/{key}",
            self.config.peer_port
        );
        let response = self
            .http
            .head(url)
            .timeout(self.config.head_probe_timeout)
            .send()
            .await;
        let response = match response {
            Ok(response) => response,
            Err(_) => return Ok(false),
        };
        let headers = response.headers();
        let key_exists = headers
            .get("x-key-exists")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value == "true");
        let generation_matches = headers
            .get("x-generation-hash")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.eq_ignore_ascii_case(root_hash));
        Ok(key_exists && generation_matches)
    }
}
