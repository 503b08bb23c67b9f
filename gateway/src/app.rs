//! Top-level wiring: builds [`AppState`], builds the [`axum::Router`], and
//! serves it with graceful shutdown.
//!
//! The reference gateway drives this through `meltdown`, registering the
//! HTTP server alongside a handful of other long-running tasks (control
//! plane client, health/rate-limit monitors, system metrics). This gateway
//! has exactly one long-running task - the HTTP server itself - so it is
//! served directly with `axum::serve` and `tokio::signal` instead of
//! pulling in a multi-task supervisor for a single task.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::{
    app_state::{AppState, InnerAppState},
    config::Config,
    error::{init::InitError, runtime::RuntimeError},
    router,
};

pub struct App {
    pub state: AppState,
}

impl App {
    pub fn new(config: Config) -> Result<Self, InitError> {
        let inner = InnerAppState::new(config)?;
        Ok(Self {
            state: AppState(std::sync::Arc::new(inner)),
        })
    }

    /// Binds the configured address and serves the router until a shutdown
    /// signal (`SIGINT`/`SIGTERM`) is received, then waits up to
    /// `server.shutdown-timeout` for in-flight requests to finish.
    pub async fn serve(self) -> Result<(), RuntimeError> {
        let config = self.state.config();
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|error| {
                RuntimeError::Init(InitError::InvalidConfig(format!(
                    "invalid server address: {error}"
                )))
            })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(InitError::Bind)
            .map_err(RuntimeError::Init)?;
        let router = router::build(self.state);

        info!(address = %addr, "server starting");

        axum::serve(listener, router)
            .with_graceful_shutdown(wait_for_shutdown_signal(config.server.shutdown_timeout))
            .await
            .map_err(RuntimeError::Serve)
    }
}

async fn wait_for_shutdown_signal(shutdown_timeout: std::time::Duration) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!(?shutdown_timeout, "shutdown signal received, draining in-flight requests");
}
