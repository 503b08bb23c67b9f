use axum::{
    Router, middleware,
    routing::{any, get},
};
use http::HeaderName;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveHeadersLayer,
    trace::TraceLayer,
};
use tracing::Level;

use crate::{
    app_state::AppState,
    handler,
    middleware::resolve_udi,
    utils::{catch_panic::PanicResponder, timer::TimerLayer},
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds the request-handling stack (§6 routes, §9/§10.2 middleware
/// layering). The whole stack is composed as a single [`tower::Layer`]
/// (rather than several chained `Router::layer` calls, whose evaluation
/// order axum inverts relative to `ServiceBuilder`) so the ordering below
/// reads top-to-bottom as "outermost to innermost", matching
/// `ServiceBuilder`'s documented semantics.
pub fn build(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let middleware_stack = ServiceBuilder::new()
        .layer(CatchPanicLayer::custom(PanicResponder))
        .layer(SetSensitiveHeadersLayer::new(std::iter::once(
            http::header::COOKIE,
        )))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            telemetry::MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(telemetry::span::SpanFactory::new(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(TimerLayer::new())
        .layer(middleware::from_fn_with_state(state.clone(), resolve_udi));

    Router::new()
        .route("/health", get(handler::health))
        .fallback(any(handler::proxy_handler))
        .layer(middleware_stack)
        .with_state(state)
}
