//! Session storage error types.

use thiserror::Error;

/// Session storage error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StorageError {
    #[error("session storage not available: {0}")]
    NotAvailable(String),

    #[error("failed to read saved session: {0}")]
    ReadFailed(String),

    #[error("failed to save session: {0}")]
    WriteFailed(String),

    #[error("failed to clear saved session: {0}")]
    ClearFailed(String),
}
