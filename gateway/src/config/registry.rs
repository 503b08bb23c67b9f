use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct RegistryConfig {
    /// How long a store's peer list is trusted before a refresh is
    /// attempted in the background.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    /// Number of peers requested from the oracle per store on seed/refresh.
    pub seed_size: usize,
    /// How long a peer stays in the offline set after being blacklisted.
    #[serde(with = "humantime_serde")]
    pub offline_ttl: Duration,
    /// How often the background task re-checks whether any registry entry
    /// needs a refresh.
    #[serde(with = "humantime_serde")]
    pub refresh_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            seed_size: 50,
            offline_ttl: Duration::from_secs(5 * 60),
            refresh_interval: Duration::from_secs(30 * 60),
        }
    }
}
