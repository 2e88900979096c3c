//! Authentication DTOs.

use std::fmt;

use crate::domain::entities::Session;

/// How the user chose to authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Existing account.
    Login,
    /// New account.
    Register,
    /// Anonymous guest.
    Guest,
}

impl AuthMethod {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "registration",
            Self::Guest => "guest access",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Form credentials. The password never appears in debug output.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Display name, register only.
    pub name: Option<String>,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
            password: password.into(),
        }
    }

    /// Sets the display name. Blank names are dropped.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.trim().is_empty()).then_some(name);
        self
    }

    /// Returns whether both required fields are filled. Values are taken
    /// as typed, so whitespace counts.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Authentication request.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    /// Method used.
    pub method: AuthMethod,
    /// Credentials, absent for guests.
    pub credentials: Option<Credentials>,
    /// Whether to persist the resulting user id.
    pub persist: bool,
}

impl AuthRequest {
    /// Creates login request.
    #[must_use]
    pub const fn login(credentials: Credentials) -> Self {
        Self {
            method: AuthMethod::Login,
            credentials: Some(credentials),
            persist: true,
        }
    }

    /// Creates register request.
    #[must_use]
    pub const fn register(credentials: Credentials) -> Self {
        Self {
            method: AuthMethod::Register,
            credentials: Some(credentials),
            persist: true,
        }
    }

    /// Creates guest request. Guests are never persisted.
    #[must_use]
    pub const fn guest() -> Self {
        Self {
            method: AuthMethod::Guest,
            credentials: None,
            persist: false,
        }
    }

    /// Disables persistence.
    #[must_use]
    pub const fn without_persistence(mut self) -> Self {
        self.persist = false;
        self
    }
}

/// Authentication response.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    /// Established session.
    pub session: Session,
    /// Email echoed by the server.
    pub email: Option<String>,
    /// Whether the user id was persisted.
    pub persisted: bool,
}
