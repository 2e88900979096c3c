//! Domain error types.

mod api_error;
mod auth_error;
mod storage_error;

pub use api_error::ApiError;
pub use auth_error::{AuthError, CONNECTION_FAILED};
pub use storage_error::StorageError;
