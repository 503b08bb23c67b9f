use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Well-known paths answered with a bare 404 instead of entering the
    /// UDI resolver, e.g. `/.well-known/*`, `/favicon.ico`. `/health` is
    /// its own special case (see `middleware::resolve_udi`): it bypasses
    /// the resolver too, but dispatches to the health handler rather than
    /// a 404.
    pub bypass_prefixes: Vec<String>,
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4162,
            bypass_prefixes: vec![
                "/.well-known/".to_string(),
                "/favicon.ico".to_string(),
            ],
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}
