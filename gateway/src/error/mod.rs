pub mod api;
pub mod init;
pub mod internal;
pub mod runtime;

pub use api::ApiError;
pub use init::InitError;
pub use internal::InternalError;
pub use runtime::RuntimeError;
