//! Assistant backend HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, multipart};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{
    AuthResponseBody, ChatRequestBody, ChatResponseBody, LoginBody, RegisterBody,
    UploadResponseBody,
};
use crate::domain::entities::{Attachment, AuthOutcome, ChatReply, UploadOutcome};
use crate::domain::errors::ApiError;
use crate::domain::ports::AssistantApiPort;

const REGISTER_PATH: &str = "/auth/register";
const LOGIN_PATH: &str = "/auth/login";
const GUEST_PATH: &str = "/auth/guest";
const CHAT_PATH: &str = "/api/chat";
const UPLOAD_PATH: &str = "/api/upload";

/// HTTP/JSON client for the assistant backend.
///
/// Bodies are decoded whatever the HTTP status, since the backend reports
/// failures as `{"error": ...}` alongside 4xx codes.
pub struct HttpAssistantClient {
    client: Client,
    base_url: String,
}

impl HttpAssistantClient {
    /// Creates client for the given base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder =
            Client::builder().user_agent(format!("{}/{}", crate::NAME, crate::VERSION));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ApiError::ClientBuild {
            message: e.to_string(),
        })?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(%base_url, ?timeout, "Created assistant API client");

        Ok(Self { client, base_url })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(path, "Sending request");

        let response = request.send().await.map_err(|e| {
            warn!(path, error = %e, "Failed to reach assistant API");
            map_transport(&e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            warn!(path, error = %e, "Failed to read response body");
            map_transport(&e)
        })?;

        debug!(path, %status, len = bytes.len(), "Received response");

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(path, %status, error = %e, "Failed to parse response");
            ApiError::decode(format!("HTTP {status}: {e}"))
        })
    }
}

fn map_transport(e: &reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_connect() {
        ApiError::transport("failed to connect to server")
    } else {
        ApiError::transport(e.to_string())
    }
}

#[async_trait]
impl AssistantApiPort for HttpAssistantClient {
    async fn register(
        &self,
        name: Option<&str>,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, ApiError> {
        let body = RegisterBody {
            name,
            email,
            password,
        };
        let request = self.client.post(self.url(REGISTER_PATH)).json(&body);
        self.send::<AuthResponseBody>(REGISTER_PATH, request)
            .await?
            .into_outcome()
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, ApiError> {
        let body = LoginBody { email, password };
        let request = self.client.post(self.url(LOGIN_PATH)).json(&body);
        self.send::<AuthResponseBody>(LOGIN_PATH, request)
            .await?
            .into_outcome()
    }

    async fn guest_login(&self) -> Result<AuthOutcome, ApiError> {
        let request = self.client.post(self.url(GUEST_PATH));
        self.send::<AuthResponseBody>(GUEST_PATH, request)
            .await?
            .into_outcome()
    }

    async fn chat(
        &self,
        user_id: &str,
        query: &str,
        is_guest: bool,
    ) -> Result<ChatReply, ApiError> {
        let body = ChatRequestBody {
            user_id,
            query,
            is_guest,
        };
        let request = self.client.post(self.url(CHAT_PATH)).json(&body);
        let response: ChatResponseBody = self.send(CHAT_PATH, request).await?;
        Ok(response.into())
    }

    async fn upload(
        &self,
        user_id: &str,
        attachment: Attachment,
        is_guest: bool,
    ) -> Result<UploadOutcome, ApiError> {
        let (info, data) = attachment.into_parts();
        let part = multipart::Part::bytes(Vec::from(data))
            .file_name(info.name().to_string())
            .mime_str(info.mime())
            .map_err(|e| ApiError::transport(format!("invalid MIME type: {e}")))?;

        let form = multipart::Form::new()
            .text("user_id", user_id.to_string())
            .part("file", part)
            .text("is_guest", is_guest.to_string());

        let request = self.client.post(self.url(UPLOAD_PATH)).multipart(form);
        let response: UploadResponseBody = self.send(UPLOAD_PATH, request).await?;
        Ok(response.into())
    }
}
