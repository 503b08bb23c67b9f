//! Shared test helpers. Unit tests colocated with the modules they cover
//! define their own narrow stubs (see e.g. `udi::resolver`'s
//! `StubCoinInfo`); this module is for the end-to-end scaffolding used by
//! the integration tests under `tests/`, which exercise the real
//! [`crate::oracle::OracleClient`] against a `wiremock` server standing in
//! for the oracle and the peers it points at.

use axum::Router;

use crate::{
    app_state::AppState,
    config::{Config, TestDefault},
    router,
};

/// A [`Config`] wired to talk to `oracle_base_url` (typically a
/// `wiremock::MockServer`'s `.uri()`) with retries disabled, so integration
/// tests don't wait out backoff delays on expected failures.
#[must_use]
pub fn test_config(oracle_base_url: &str) -> Config {
    let mut config = Config::test_default();
    config.oracle.base_url = oracle_base_url.to_string();
    config
}

/// Builds a full router backed by a real [`crate::oracle::OracleClient`]
/// pointed at `oracle_base_url`, for tests driving the stack through
/// `tower::ServiceExt::oneshot`/`axum_test`-style HTTP calls.
#[must_use]
pub fn test_router(oracle_base_url: &str) -> Router {
    let state = AppState::new_for_test(test_config(oracle_base_url));
    router::build(state)
}
