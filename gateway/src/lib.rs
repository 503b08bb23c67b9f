//! Content-routing reverse proxy for the DIG store network.
//!
//! See [`app`] for how the pieces below are wired into one `tower::Service`,
//! and [`udi`] / [`registry`] / [`selector`] / [`proxy`] for the four
//! components the design is built around.

pub mod app;
pub mod app_state;
pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod oracle;
pub mod proxy;
pub mod registry;
pub mod router;
pub mod selector;
pub mod types;
pub mod udi;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod tests;
