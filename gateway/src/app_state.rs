use std::sync::Arc;

use crate::{
    config::Config,
    oracle::OracleClient,
    registry::PeerRegistry,
    selector::PeerSelector,
};

#[derive(Debug, Clone)]
pub struct AppState(pub Arc<InnerAppState>);

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.0.config
    }

    #[must_use]
    pub fn oracle(&self) -> &Arc<OracleClient> {
        &self.0.oracle
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<PeerRegistry<OracleClient>> {
        &self.0.registry
    }

    #[must_use]
    pub fn selector(&self) -> &PeerSelector<OracleClient, OracleClient> {
        &self.0.selector
    }

    #[must_use]
    pub fn http_client(&self) -> &reqwest::Client {
        &self.0.http_client
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn new_for_test(config: Config) -> Self {
        Self(Arc::new(
            InnerAppState::new(config).expect("test config is always valid"),
        ))
    }
}

#[derive(Debug)]
pub struct InnerAppState {
    pub config: Config,
    pub http_client: reqwest::Client,
    pub oracle: Arc<OracleClient>,
    pub registry: Arc<PeerRegistry<OracleClient>>,
    pub selector: PeerSelector<OracleClient, OracleClient>,
}

impl InnerAppState {
    pub fn new(config: Config) -> Result<Self, crate::error::InitError> {
        let oracle = Arc::new(
            OracleClient::new(config.oracle.clone())
                .map_err(|error| crate::error::InitError::InvalidConfig(error.to_string()))?,
        );
        let registry = Arc::new(PeerRegistry::new(
            Arc::clone(&oracle),
            config.registry.ttl,
            config.registry.offline_ttl,
            config.registry.seed_size,
            config.registry.refresh_interval,
        ));
        let selector = PeerSelector::new(
            Arc::clone(&registry),
            Arc::clone(&oracle),
            config.selector.clone(),
        );
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|error| crate::error::InitError::InvalidConfig(error.to_string()))?;

        Ok(Self {
            config,
            http_client,
            oracle,
            registry,
            selector,
        })
    }
}
