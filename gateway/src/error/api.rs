use axum_core::response::IntoResponse;
use displaydoc::Display;
use http::StatusCode;
use thiserror::Error;

use crate::{error::internal::InternalError, proxy::ProxyError};

/// Top level error type returned by the request-handling pipeline.
///
/// Each variant corresponds to one of the error kinds named in the design's
/// error-handling section: a malformed/unknown identifier (400), an
/// unreachable peer population (500), a failed upstream hop (502), or an
/// unexpected internal fault while resolving the identifier (500).
#[derive(Debug, Error, Display)]
pub enum ApiError {
    /// Invalid or missing storeId.
    InvalidStoreId,
    /// unknown chain `{chain}` for storeId `{store_id}`
    UnknownChain { chain: String, store_id: String },
    /// No valid peers available for storeId: {store_id}
    NoValidPeers { store_id: String },
    /// An error occurred while verifying the identifier.
    Resolver(#[from] InternalError),
    /// Proxy error
    Proxy(#[from] ProxyError),
    /// Service panicked: {0}
    Panic(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum_core::response::Response {
        match &self {
            Self::InvalidStoreId => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            Self::UnknownChain { chain, store_id } => {
                let body = format!(
                    "<html><body><h1>Unknown chain</h1><p>Chain \
                     <code>{chain}</code> is not supported for storeId \
                     <code>{store_id}</code>.</p></body></html>"
                );
                (
                    StatusCode::BAD_REQUEST,
                    [(http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
                    body,
                )
                    .into_response()
            }
            Self::NoValidPeers { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
                    .into_response()
            }
            Self::Resolver(error) => {
                tracing::error!(error = %error, "resolver error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while verifying the identifier.",
                )
                    .into_response()
            }
            Self::Proxy(error) => {
                tracing::warn!(error = %error, "upstream proxy failure");
                (StatusCode::BAD_GATEWAY, "Proxy error").into_response()
            }
            Self::Panic(error) => {
                tracing::error!(error = %error, "service panicked");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    .into_response()
            }
        }
    }
}
