use std::time::Duration;

use backon::{BackoffBuilder, ConstantBuilder, ExponentialBuilder};
use serde::{Deserialize, Serialize};

const DEFAULT_FACTOR: f32 = 2.0;

/// Retry policy for the three HTTP-backed oracle contracts in §6
/// (`current_epoch`, `sample_current_epoch`, `fetch_coin_info`).
/// Deliberately not applied to the head probe (§4.3): that call already
/// has a hard 5-second deadline and "any timeout/transport error ->
/// false" semantics, and retrying it would blow the deadline budget the
/// selector's candidate loop depends on.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", tag = "strategy")]
pub enum RetryConfig {
    Exponential {
        #[serde(with = "humantime_serde", rename = "min-delay", default = "default_min_delay")]
        min_delay: Duration,
        #[serde(with = "humantime_serde", rename = "max-delay", default = "default_max_delay")]
        max_delay: Duration,
        #[serde(rename = "max-retries", default = "default_max_retries")]
        max_retries: usize,
        #[serde(default = "default_factor")]
        factor: f32,
    },
    Constant {
        #[serde(with = "humantime_serde", default = "default_min_delay")]
        delay: Duration,
        #[serde(rename = "max-retries", default = "default_max_retries")]
        max_retries: usize,
    },
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::Exponential {
            min_delay: default_min_delay(),
            max_delay: default_max_delay(),
            max_retries: default_max_retries(),
            factor: default_factor(),
        }
    }
}

impl RetryConfig {
    /// Delays to sleep between attempts (not counting the first, immediate
    /// attempt). Empty once `max_retries` attempts have been exhausted.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        match self {
            Self::Exponential { min_delay, max_delay, max_retries, factor } => {
                ExponentialBuilder::default()
                    .with_min_delay(*min_delay)
                    .with_max_delay(*max_delay)
                    .with_max_times(*max_retries)
                    .with_factor(*factor)
                    .with_jitter()
                    .build()
                    .collect()
            }
            Self::Constant { delay, max_retries } => ConstantBuilder::default()
                .with_delay(*delay)
                .with_max_times(*max_retries)
                .build()
                .collect(),
        }
    }
}

fn default_factor() -> f32 {
    DEFAULT_FACTOR
}

fn default_max_retries() -> usize {
    2
}

fn default_min_delay() -> Duration {
    Duration::from_millis(200)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(5)
}

#[cfg(any(test, feature = "testing"))]
impl super::TestDefault for RetryConfig {
    fn test_default() -> Self {
        Self::Constant {
            delay: Duration::from_millis(1),
            max_retries: 0,
        }
    }
}
