use displaydoc::Display;
use thiserror::Error;

/// Errors that can occur while building or starting the gateway, before it
/// has accepted a single request.
#[derive(Debug, Error, Display)]
pub enum InitError {
    /// failed to read configuration: {0}
    Config(#[from] Box<crate::config::Error>),
    /// configuration is invalid: {0}
    InvalidConfig(String),
    /// failed to initialize telemetry: {0}
    Telemetry(#[from] telemetry::Error),
    /// failed to bind to address: {0}
    Bind(#[source] std::io::Error),
}
