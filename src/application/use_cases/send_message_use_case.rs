//! Send message use case implementation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::dto::OutgoingMessage;
use crate::domain::entities::{
    CONNECTION_FAILED_REPLY, ChatBody, ChatReply, FILE_RECEIVED_REPLY, Message,
    MessageIdGenerator, RECEIVED_REPLY, Session, Timestamp, UploadOutcome,
};
use crate::domain::ports::AssistantApiPort;

/// Composes the user's message and obtains the assistant's reply.
///
/// The attachment, if any, is uploaded before the chat call and the two
/// never overlap. The upload is best effort: a server-reported error is
/// logged and acknowledged like a success. With text present a transport
/// failure is also swallowed and the chat call proceeds regardless.
#[derive(Clone)]
pub struct SendMessageUseCase {
    api: Arc<dyn AssistantApiPort>,
    ids: Arc<MessageIdGenerator>,
}

impl SendMessageUseCase {
    /// Creates new send message use case.
    #[must_use]
    pub fn new(api: Arc<dyn AssistantApiPort>, ids: Arc<MessageIdGenerator>) -> Self {
        Self { api, ids }
    }

    /// Builds the optimistic user message, or `None` when there is nothing
    /// to send.
    #[must_use]
    pub fn compose(&self, outgoing: &OutgoingMessage) -> Option<Message> {
        if outgoing.is_empty() {
            return None;
        }
        Some(Message::user(
            self.ids.next_id(),
            outgoing.display_content(),
            outgoing.attachment.as_ref().map(|a| a.info().clone()),
        ))
    }

    /// Performs upload and chat, returning exactly one assistant message.
    pub async fn execute(&self, session: &Session, outgoing: OutgoingMessage) -> Message {
        let has_text = outgoing.has_text();
        let OutgoingMessage { text, attachment } = outgoing;

        let mut attachment_reply = None;
        if let Some(attachment) = attachment {
            let name = attachment.name().to_string();
            debug!(file = %name, size = attachment.data().len(), "Uploading attachment");

            attachment_reply = Some(
                match self
                    .api
                    .upload(session.user_id(), attachment, session.is_guest())
                    .await
                {
                    Ok(UploadOutcome::Processed(payload)) => {
                        debug!(file = %name, ?payload, "Attachment processed");
                        FILE_RECEIVED_REPLY.to_string()
                    }
                    Ok(UploadOutcome::Rejected(message)) => {
                        warn!(file = %name, %message, "Server rejected attachment");
                        FILE_RECEIVED_REPLY.to_string()
                    }
                    Err(e) => {
                        warn!(file = %name, error = %e, "Attachment upload failed");
                        CONNECTION_FAILED_REPLY.to_string()
                    }
                },
            );
        }

        if !has_text {
            let content = attachment_reply.unwrap_or_else(|| FILE_RECEIVED_REPLY.to_string());
            return Message::assistant(self.ids.next_id(), content, Timestamp::now());
        }

        debug!(user = %session, "Sending chat query");
        match self
            .api
            .chat(session.user_id(), &text, session.is_guest())
            .await
        {
            Ok(reply) => self.reply_message(reply),
            Err(e) => {
                warn!(error = %e, "Chat request failed");
                Message::assistant(self.ids.next_id(), CONNECTION_FAILED_REPLY, Timestamp::now())
            }
        }
    }

    fn reply_message(&self, reply: ChatReply) -> Message {
        let content = match reply.body {
            ChatBody::Answer(response) => response,
            ChatBody::Rejected(message) => {
                warn!(%message, "Server reported chat error");
                message
            }
            ChatBody::Empty => RECEIVED_REPLY.to_string(),
        };
        let timestamp = reply
            .timestamp
            .filter(|t| !t.is_empty())
            .map_or_else(Timestamp::now, Timestamp::from_server);

        Message::assistant(self.ids.next_id(), content, timestamp)
    }
}
