use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Response},
};
use http::Method;
use tokio::time::Instant;

use crate::{app_state::AppState, error::api::ApiError, proxy, types::SharedRequestContext};

/// `GET /health` (§6). Deliberately outside the UDI resolver/selector
/// pipeline — it must answer even when the peer oracle or every known
/// peer is unreachable.
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// Drives §4.3 (selection + validation) and §4.4 (proxying) for a request
/// the resolver middleware has already attached a [`crate::types::RequestContext`] to.
pub async fn proxy_handler(
    State(state): State<AppState>,
    Extension(context): Extension<SharedRequestContext>,
    arrived_at: Option<Extension<Instant>>,
    method: Method,
) -> Response {
    let mut rng = rand::rng();
    let selection = match state
        .selector()
        .select(&context.store_id, &context.root_hash, context.key.as_deref(), &mut rng)
        .await
    {
        Ok(Some(selection)) => selection,
        Ok(None) => {
            return ApiError::NoValidPeers {
                store_id: context.store_id.clone(),
            }
            .into_response();
        }
        Err(error) => return ApiError::Resolver(error).into_response(),
    };

    tracing::Span::current().record("peer", selection.peer.ip());

    let result = proxy::forward(
        state.http_client(),
        &state.config().oracle,
        &state.registry().active_connections,
        &state.registry().offline,
        &selection.peer,
        state.config().selector.failure_threshold,
        &context.chain,
        &context.store_id,
        &context.root_hash,
        &context.subpath,
        method,
    )
    .await;

    if let Some(Extension(arrived_at)) = arrived_at {
        tracing::debug!(total_ms = arrived_at.elapsed().as_millis(), "request handled");
    }

    match result {
        Ok(response) => response,
        Err(error) => ApiError::Proxy(error).into_response(),
    }
}
