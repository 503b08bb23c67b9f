use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use http::{HeaderValue, StatusCode, header};

use crate::{
    app_state::AppState,
    error::api::ApiError,
    types::SharedRequestContext,
    udi::{self, ResolveInput, ResolveOutcome},
};

/// Implements the UDI resolver's contract (§4.1) as request middleware:
/// requests under a configured bypass prefix (`/.well-known/*`, health
/// checks, ...) pass straight through, everything else either short
/// circuits with a redirect/400, or has a [`crate::types::RequestContext`]
/// attached to its extensions for the proxy handler downstream to read
/// (§9 "dynamic request enrichment").
pub async fn resolve_udi(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if path == "/health" {
        return next.run(request).await;
    }
    if state
        .config()
        .server
        .bypass_prefixes
        .iter()
        .any(|prefix| path.starts_with(prefix.as_str()))
    {
        return StatusCode::NOT_FOUND.into_response();
    }

    let original_url = request
        .uri()
        .path_and_query()
        .map_or_else(|| path.to_string(), |pq| pq.as_str().to_string());
    let headers = request.headers().clone();
    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let cf_id = headers
        .get("x-amz-cf-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let forwarded_host = headers
        .get("x-forwarded-host")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let origin_path = headers
        .get("x-origin-path")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let cookie = udi::cookie::read(&jar, &state.config().cookie);

    let input = ResolveInput {
        original_url: &original_url,
        cookie,
        referer: referer.as_deref(),
        cf_id: cf_id.as_deref(),
        forwarded_host: forwarded_host.as_deref(),
        host: host.as_deref(),
        origin_path: origin_path.as_deref(),
    };

    let outcome = udi::resolve(input, &state.config().chains.allowed, state.oracle().as_ref()).await;

    match outcome {
        // §4.1 specifies 302 Found redirects. `axum::response::Redirect::to`
        // issues 303 See Other, which would turn a client's POST into a GET
        // on redirect and doesn't match the wire contract, so the response
        // is built directly instead.
        Ok(ResolveOutcome::Redirect(location)) => redirect_found(&location),
        Ok(ResolveOutcome::BadRequest { body }) => {
            (StatusCode::BAD_REQUEST, body).into_response()
        }
        Ok(ResolveOutcome::UnknownChain { chain, store_id }) => {
            ApiError::UnknownChain { chain, store_id }.into_response()
        }
        Ok(ResolveOutcome::Resolved { context, set_cookie }) => {
            let span = tracing::Span::current();
            span.record("chain", &context.chain);
            span.record("store_id", &context.store_id);
            span.record("root_hash", &context.root_hash);
            let context: SharedRequestContext = Arc::new(context);
            request.extensions_mut().insert(context);
            let mut response = next.run(request).await;
            if let Ok(cookie) = udi::cookie::build(&set_cookie, &state.config().cookie) {
                if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
            }
            response
        }
        Err(error) => ApiError::Resolver(error).into_response(),
    }
}

/// 302 Found redirect with the given location, per §4.1/§6's canonical
/// redirect forms.
fn redirect_found(location: &str) -> Response {
    let mut response = StatusCode::FOUND.into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}
