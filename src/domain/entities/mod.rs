//! Domain entity definitions.

mod attachment;
mod message;
mod outcome;
mod session;

pub use attachment::{Attachment, MediaInfo, MediaKind};
pub use message::{
    CONNECTION_FAILED_REPLY, FILE_RECEIVED_REPLY, GREETING, Message, MessageId,
    MessageIdGenerator, RECEIVED_REPLY, Timestamp,
};
pub use outcome::{AuthOutcome, ChatBody, ChatReply, UploadOutcome};
pub use session::Session;
