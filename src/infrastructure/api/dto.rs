//! Wire formats of the assistant backend.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{AuthOutcome, ChatBody, ChatReply, UploadOutcome};
use crate::domain::errors::ApiError;

/// `POST /auth/register` body.
#[derive(Debug, Serialize)]
pub struct RegisterBody<'a> {
    /// Optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    /// Email.
    pub email: &'a str,
    /// Password.
    pub password: &'a str,
}

/// `POST /auth/login` body.
#[derive(Debug, Serialize)]
pub struct LoginBody<'a> {
    /// Email.
    pub email: &'a str,
    /// Password.
    pub password: &'a str,
}

/// `POST /api/chat` body.
#[derive(Debug, Serialize)]
pub struct ChatRequestBody<'a> {
    /// Sender id.
    pub user_id: &'a str,
    /// Query text.
    pub query: &'a str,
    /// Guest flag.
    pub is_guest: bool,
}

/// Response of every `/auth/*` endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AuthResponseBody {
    /// Issued user id.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Echoed email.
    #[serde(default)]
    pub email: Option<String>,
    /// Server error.
    #[serde(default)]
    pub error: Option<String>,
}

impl AuthResponseBody {
    /// Converts into an outcome. An error field always wins.
    ///
    /// # Errors
    /// Returns `ApiError::Decode` when neither an error nor a user id is present.
    pub fn into_outcome(self) -> Result<AuthOutcome, ApiError> {
        let user_id = non_empty(self.user_id);
        if let Some(message) = non_empty(self.error) {
            return Ok(AuthOutcome::Rejected { message, user_id });
        }
        let user_id = user_id.ok_or_else(|| ApiError::decode("response has no user_id"))?;
        Ok(AuthOutcome::Authenticated {
            user_id,
            email: non_empty(self.email),
        })
    }
}

/// Response of `POST /api/chat`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatResponseBody {
    /// Echoed user id.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Assistant answer.
    #[serde(default)]
    pub response: Option<String>,
    /// Server timestamp.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Server error.
    #[serde(default)]
    pub error: Option<String>,
}

impl From<ChatResponseBody> for ChatReply {
    fn from(body: ChatResponseBody) -> Self {
        let reply = match (non_empty(body.response), non_empty(body.error)) {
            (Some(response), _) => ChatBody::Answer(response),
            (None, Some(error)) => ChatBody::Rejected(error),
            (None, None) => ChatBody::Empty,
        };
        Self {
            user_id: non_empty(body.user_id),
            body: reply,
            timestamp: non_empty(body.timestamp),
        }
    }
}

/// Response of `POST /api/upload`.
#[derive(Debug, Default, Deserialize)]
pub struct UploadResponseBody {
    /// Opaque processing metadata.
    #[serde(default)]
    pub processed: Option<serde_json::Value>,
    /// Server error.
    #[serde(default)]
    pub error: Option<String>,
}

impl From<UploadResponseBody> for UploadOutcome {
    fn from(body: UploadResponseBody) -> Self {
        match non_empty(body.error) {
            Some(message) => Self::Rejected(message),
            None => Self::Processed(body.processed),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
