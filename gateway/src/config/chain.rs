use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ChainConfig {
    /// Chain identifiers accepted in the first segment of a UDI, e.g.
    /// `chia`, `xch`. Anything else yields `ApiError::UnknownChain`.
    pub allowed: Vec<String>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            allowed: vec!["chia".to_string()],
        }
    }
}
