//! Application layer with use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Use case implementations.
pub mod use_cases;

pub use dto::{AuthMethod, AuthRequest, AuthResponse, Credentials, OutgoingMessage};
pub use use_cases::{AuthenticateUseCase, ResolveSessionUseCase, SendMessageUseCase};
