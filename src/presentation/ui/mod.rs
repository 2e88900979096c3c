//! UI screens.

mod app;
mod auth_screen;
mod chat_screen;

pub use app::App;
pub use auth_screen::{AuthAction, AuthScreen, AuthState, AuthTab};
pub use chat_screen::{ChatKeyResult, ChatScreen, ChatScreenState};
