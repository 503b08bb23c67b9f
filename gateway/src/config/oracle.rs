use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::retry::RetryConfig;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct OracleConfig {
    /// Base URL of the peer/coin oracle, e.g. `https://api.dig.net`.
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Port peers expose their content endpoint on.
    pub peer_port: u16,
    #[serde(with = "humantime_serde")]
    pub head_probe_timeout: Duration,
    /// Retry policy for `current_epoch`/`sample_current_epoch`/
    /// `fetch_coin_info`. Never applied to the head probe (see
    /// `RetryConfig`'s doc comment).
    pub retry: RetryConfig,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.dig.net".to_string(),
            request_timeout: Duration::from_secs(10),
            peer_port: 4161,
            head_probe_timeout: Duration::from_secs(5),
            retry: RetryConfig::default(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl super::TestDefault for OracleConfig {
    fn test_default() -> Self {
        use super::TestDefault;
        Self {
            retry: RetryConfig::test_default(),
            ..Self::default()
        }
    }
}
