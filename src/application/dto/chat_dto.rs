//! Chat DTOs.

use crate::domain::entities::Attachment;

/// Text and/or attachment composed by the user.
#[derive(Debug, Clone, Default)]
pub struct OutgoingMessage {
    /// Input text as typed.
    pub text: String,
    /// Staged attachment.
    pub attachment: Option<Attachment>,
}

impl OutgoingMessage {
    /// Creates outgoing message.
    #[must_use]
    pub fn new(text: impl Into<String>, attachment: Option<Attachment>) -> Self {
        Self {
            text: text.into(),
            attachment,
        }
    }

    /// Returns whether text other than whitespace was entered.
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Returns whether there is nothing to send.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_text() && self.attachment.is_none()
    }

    /// Returns the content shown on the user's own message. Typed text is
    /// kept verbatim, whitespace included; the upload label only replaces
    /// an empty input.
    #[must_use]
    pub fn display_content(&self) -> String {
        match &self.attachment {
            Some(attachment) if self.text.is_empty() => {
                format!("Uploaded: {}", attachment.name())
            }
            _ => self.text.clone(),
        }
    }
}
