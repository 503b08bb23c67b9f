use http::Request;
use tower_http::trace::MakeSpan;
use tracing::Level;

/// Builds the top-level span every inbound request is processed under.
///
/// Mirrors the shape of a typical `tower_http::trace::TraceLayer` span
/// factory: one span per request, carrying method/uri/request-id, with
/// resolver- and selector-specific fields (chain, store, root hash, chosen
/// peer) filled in later via `tracing::Span::current().record(..)` once
/// they're known — the UDI resolver middleware records `chain`/`store_id`/
/// `root_hash` once resolution succeeds, and the proxy handler records
/// `peer` once a peer is selected.
#[derive(Debug, Clone, Copy)]
pub struct SpanFactory {
    level: Level,
}

impl SpanFactory {
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }
}

impl<B> MakeSpan<B> for SpanFactory {
    fn make_span(&mut self, request: &Request<B>) -> tracing::Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        macro_rules! make {
            ($level:expr) => {
                tracing::span!(
                    $level,
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id,
                    chain = tracing::field::Empty,
                    store_id = tracing::field::Empty,
                    root_hash = tracing::field::Empty,
                    peer = tracing::field::Empty,
                )
            };
        }

        match self.level {
            Level::TRACE => make!(Level::TRACE),
            Level::DEBUG => make!(Level::DEBUG),
            Level::INFO => make!(Level::INFO),
            Level::WARN => make!(Level::WARN),
            Level::ERROR => make!(Level::ERROR),
        }
    }
}
