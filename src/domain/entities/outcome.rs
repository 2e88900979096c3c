//! Parsed backend outcomes.
//!
//! The backend reports failures inside a successful transport exchange via
//! an `error` field. These enums make that branch explicit per endpoint.

/// Result of a register, login, or guest request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Server accepted the request.
    Authenticated {
        /// Issued user identifier.
        user_id: String,
        /// Echoed email, when provided.
        email: Option<String>,
    },
    /// Server reported an error.
    Rejected {
        /// Server error text, shown verbatim.
        message: String,
        /// User id sent alongside the error, if any.
        user_id: Option<String>,
    },
}

impl AuthOutcome {
    /// Creates a rejection without a user id.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            user_id: None,
        }
    }
}

/// Body of a chat reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatBody {
    /// Assistant answered.
    Answer(String),
    /// Server reported an error and gave no answer.
    Rejected(String),
    /// Neither answer nor error was present.
    Empty,
}

/// Result of a chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// User id echoed by the server.
    pub user_id: Option<String>,
    /// Answer or error.
    pub body: ChatBody,
    /// Server timestamp in ISO-8601.
    pub timestamp: Option<String>,
}

impl ChatReply {
    /// Creates a reply carrying an answer.
    #[must_use]
    pub fn answer(response: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            user_id: None,
            body: ChatBody::Answer(response.into()),
            timestamp,
        }
    }

    /// Creates a reply carrying a server error.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            user_id: None,
            body: ChatBody::Rejected(message.into()),
            timestamp: None,
        }
    }
}

/// Result of an upload request.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Server accepted the file. The payload is opaque to the client.
    Processed(Option<serde_json::Value>),
    /// Server reported an error.
    Rejected(String),
}
