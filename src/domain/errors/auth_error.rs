//! Authentication error types.

use thiserror::Error;

use super::{ApiError, StorageError};

/// Message shown on the auth screen when the backend cannot be reached.
pub const CONNECTION_FAILED: &str = "Connection failed. Is the server running?";

/// Authentication error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,

    #[error("rejected by server: {message}")]
    Rejected { message: String },

    #[error("connection failed: {0}")]
    Connection(#[from] ApiError),

    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Creates rejected error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Returns the text shown to the user.
    ///
    /// Server-reported errors pass through verbatim; transport failures
    /// collapse into one generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message } => message.clone(),
            Self::MissingCredentials => "Email and password are required".to_string(),
            Self::Connection(_) => CONNECTION_FAILED.to_string(),
            Self::Storage(e) => e.to_string(),
        }
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
