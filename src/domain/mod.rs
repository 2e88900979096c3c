//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{
    Attachment, AuthOutcome, ChatBody, ChatReply, MediaInfo, MediaKind, Message, MessageId,
    MessageIdGenerator, Session, Timestamp, UploadOutcome,
};
pub use errors::{ApiError, AuthError, StorageError};
pub use ports::{AssistantApiPort, SessionStoragePort};
