//! Client session value object.

use std::fmt;

/// Authenticated or guest user driving the chat view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: String,
    is_guest: bool,
}

impl Session {
    /// Creates a session for a registered user.
    #[must_use]
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_guest: false,
        }
    }

    /// Creates an anonymous guest session.
    #[must_use]
    pub fn guest(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            is_guest: true,
        }
    }

    /// Returns the backend user identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns whether this is a guest session.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        self.is_guest
    }

    /// Returns the subtitle shown in the chat header.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        if self.is_guest {
            "Guest Session"
        } else {
            "Personalized Support"
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_guest {
            write!(f, "guest:{}", self.user_id)
        } else {
            write!(f, "user:{}", self.user_id)
        }
    }
}
