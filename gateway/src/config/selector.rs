use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Consecutive failures before a peer is moved to the offline set.
    pub failure_threshold: u64,
    /// Probability (0.0-1.0) that each independent override (least
    /// connections, lowest latency, highest success rate) is applied on
    /// top of the base weighted-random draw.
    pub override_probability: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            override_probability: 0.5,
        }
    }
}
