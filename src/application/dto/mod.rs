//! Data transfer objects for the application layer.

mod auth_dto;
mod chat_dto;

pub use auth_dto::{AuthMethod, AuthRequest, AuthResponse, Credentials};
pub use chat_dto::OutgoingMessage;
