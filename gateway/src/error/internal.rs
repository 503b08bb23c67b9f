use displaydoc::Display;
use thiserror::Error;

/// Errors that indicate a bug or an unexpected environment fault rather than
/// a problem with the client's request. These always surface to the client
/// as the resolver's generic 500, per spec §7 `ResolverException`.
#[derive(Debug, Error, Display)]
pub enum InternalError {
    /// error calling the peer oracle: {0}
    Oracle(#[from] reqwest::Error),
    /// unparseable JSON payload: {0}
    JsonDecode(#[from] serde_json::Error),
}
