//! Structured logging setup shared by the gateway binary.
//!
//! This is a deliberately small slice of the observability stack a
//! multi-tenant gateway would carry: a single `tracing-subscriber`
//! registry, selectable between a human-readable compact format (for local
//! development) and newline-delimited JSON (for production log shipping).

mod config;
pub mod request_id;
pub mod span;

use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use config::{Config, Format};
pub use request_id::MakeRequestUuid;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid tracing filter directive: {0}")]
    InvalidFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Installs the global `tracing` subscriber described by `config`.
///
/// Idempotent only in the sense that `tracing`'s own global dispatcher is:
/// calling this twice in one process will panic, same as calling
/// `tracing_subscriber::Registry::try_init` twice would.
pub fn init_telemetry(config: &Config) -> Result<(), Error> {
    let filter = EnvFilter::try_new(&config.level)?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        Format::Compact => {
            registry
                .with(tracing_subscriber::fmt::layer().with_target(true))
                .init();
        }
        Format::Json => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(false),
                )
                .init();
        }
    }

    Ok(())
}
