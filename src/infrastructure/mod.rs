//! Infrastructure layer with external service adapters.

/// Assistant backend client.
pub mod api;
/// Attachment loading.
pub mod attachments;
/// Application configuration.
pub mod config;
/// Session storage adapters.
pub mod storage;

pub use api::HttpAssistantClient;
pub use attachments::{AttachmentError, is_accepted, load_attachment};
pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use storage::{DisabledSessionStorage, StateFileSessionStorage};
