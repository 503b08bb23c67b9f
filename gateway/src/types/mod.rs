pub mod epoch;
pub mod udi;

pub use epoch::Epoch;
pub use udi::{Udi, UdiCookie};

use std::sync::Arc;

/// Fully resolved identifier attached to a request once the UDI resolver
/// has finished with it, handed to the proxy through the request
/// extensions rather than threaded through function arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub chain: String,
    pub store_id: String,
    pub root_hash: String,
    /// Remainder of the path after the UDI segment, e.g. `/foo/bar`.
    pub subpath: String,
    /// The whole subpath, trimmed of its leading slash, when non-empty —
    /// treated as the content key the selector should also try validating
    /// directly against (key-aware fallback, §4.3).
    pub key: Option<String>,
}

pub type SharedRequestContext = Arc<RequestContext>;
