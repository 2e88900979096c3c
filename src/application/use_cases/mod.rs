//! Use case implementations.

mod authenticate_use_case;
mod resolve_session_use_case;
mod send_message_use_case;

pub use authenticate_use_case::AuthenticateUseCase;
pub use resolve_session_use_case::ResolveSessionUseCase;
pub use send_message_use_case::SendMessageUseCase;
