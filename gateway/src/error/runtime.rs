use displaydoc::Display;
use thiserror::Error;

use crate::error::init::InitError;

/// Errors that can terminate the running server task.
#[derive(Debug, Error, Display)]
pub enum RuntimeError {
    /// initialization failed: {0}
    Init(#[from] InitError),
    /// server failed while serving: {0}
    Serve(#[source] std::io::Error),
}
