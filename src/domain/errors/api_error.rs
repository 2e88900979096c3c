//! Backend transport error types.

use thiserror::Error;

/// Failure to complete a request/response exchange.
///
/// Server-reported errors are not represented here; they arrive as parsed
/// outcomes.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    #[error("failed to reach server: {message}")]
    Transport { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("malformed server response: {message}")]
    Decode { message: String },

    #[error("failed to create HTTP client: {message}")]
    ClientBuild { message: String },
}

impl ApiError {
    /// Creates transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns whether the request never produced a response.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout)
    }
}
