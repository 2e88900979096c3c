//! Assistant backend port definition.

use async_trait::async_trait;

use crate::domain::entities::{Attachment, AuthOutcome, ChatReply, UploadOutcome};
use crate::domain::errors::ApiError;

/// Port for the assistant backend.
///
/// Every operation is a single round trip without retry. Implementations
/// return `Ok` whenever a response body was received and parsed, including
/// server-reported errors, and `Err` only when the exchange itself failed.
#[async_trait]
pub trait AssistantApiPort: Send + Sync {
    /// Creates an account.
    async fn register(
        &self,
        name: Option<&str>,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, ApiError>;

    /// Signs in with credentials.
    async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, ApiError>;

    /// Obtains an anonymous guest identity.
    async fn guest_login(&self) -> Result<AuthOutcome, ApiError>;

    /// Sends a chat query.
    async fn chat(&self, user_id: &str, query: &str, is_guest: bool)
    -> Result<ChatReply, ApiError>;

    /// Uploads an attachment. Takes ownership so the contents are released
    /// once the request completes.
    async fn upload(
        &self,
        user_id: &str,
        attachment: Attachment,
        is_guest: bool,
    ) -> Result<UploadOutcome, ApiError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;

    /// Recorded call against the mock backend.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ApiCall {
        Register { name: Option<String>, email: String },
        Login { email: String },
        Guest,
        Chat { user_id: String, query: String, is_guest: bool },
        Upload { user_id: String, name: String, is_guest: bool },
    }

    /// Mock backend with scripted responses.
    pub struct MockAssistantApi {
        calls: Mutex<Vec<ApiCall>>,
        auth: Mutex<Result<AuthOutcome, ApiError>>,
        chat: Mutex<Result<ChatReply, ApiError>>,
        upload: Mutex<Result<UploadOutcome, ApiError>>,
    }

    impl MockAssistantApi {
        /// Creates mock that accepts everything.
        pub fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                auth: Mutex::new(Ok(AuthOutcome::Authenticated {
                    user_id: "user-1".to_string(),
                    email: None,
                })),
                chat: Mutex::new(Ok(ChatReply::answer("ok", None))),
                upload: Mutex::new(Ok(UploadOutcome::Processed(None))),
            }
        }

        /// Scripts auth responses.
        pub fn with_auth(self, response: Result<AuthOutcome, ApiError>) -> Self {
            *self.auth.lock() = response;
            self
        }

        /// Scripts chat responses.
        pub fn with_chat(self, response: Result<ChatReply, ApiError>) -> Self {
            *self.chat.lock() = response;
            self
        }

        /// Scripts upload responses.
        pub fn with_upload(self, response: Result<UploadOutcome, ApiError>) -> Self {
            *self.upload.lock() = response;
            self
        }

        /// Returns recorded calls in order.
        pub fn calls(&self) -> Vec<ApiCall> {
            self.calls.lock().clone()
        }

        fn record(&self, call: ApiCall) {
            self.calls.lock().push(call);
        }
    }

    impl Default for MockAssistantApi {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl AssistantApiPort for MockAssistantApi {
        async fn register(
            &self,
            name: Option<&str>,
            email: &str,
            _password: &str,
        ) -> Result<AuthOutcome, ApiError> {
            self.record(ApiCall::Register {
                name: name.map(String::from),
                email: email.to_string(),
            });
            self.auth.lock().clone()
        }

        async fn login(&self, email: &str, _password: &str) -> Result<AuthOutcome, ApiError> {
            self.record(ApiCall::Login {
                email: email.to_string(),
            });
            self.auth.lock().clone()
        }

        async fn guest_login(&self) -> Result<AuthOutcome, ApiError> {
            self.record(ApiCall::Guest);
            self.auth.lock().clone()
        }

        async fn chat(
            &self,
            user_id: &str,
            query: &str,
            is_guest: bool,
        ) -> Result<ChatReply, ApiError> {
            self.record(ApiCall::Chat {
                user_id: user_id.to_string(),
                query: query.to_string(),
                is_guest,
            });
            self.chat.lock().clone()
        }

        async fn upload(
            &self,
            user_id: &str,
            attachment: Attachment,
            is_guest: bool,
        ) -> Result<UploadOutcome, ApiError> {
            self.record(ApiCall::Upload {
                user_id: user_id.to_string(),
                name: attachment.name().to_string(),
                is_guest,
            });
            self.upload.lock().clone()
        }
    }
}
