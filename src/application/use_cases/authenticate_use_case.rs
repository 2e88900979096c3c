//! Authentication use case implementation.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::dto::{AuthMethod, AuthRequest, AuthResponse};
use crate::domain::entities::{AuthOutcome, Session};
use crate::domain::errors::{ApiError, AuthError};
use crate::domain::ports::{AssistantApiPort, SessionStoragePort};

/// Handles login, registration, guest access and logout.
#[derive(Clone)]
pub struct AuthenticateUseCase {
    api: Arc<dyn AssistantApiPort>,
    storage: Arc<dyn SessionStoragePort>,
}

impl AuthenticateUseCase {
    /// Creates new authenticate use case.
    #[must_use]
    pub fn new(api: Arc<dyn AssistantApiPort>, storage: Arc<dyn SessionStoragePort>) -> Self {
        Self { api, storage }
    }

    /// Executes authentication with provided request.
    ///
    /// # Errors
    /// Returns error if credentials are missing, the server rejects the
    /// request, or the server cannot be reached.
    pub async fn execute(&self, request: AuthRequest) -> Result<AuthResponse, AuthError> {
        debug!(method = %request.method, "Attempting authentication");

        let outcome = match request.method {
            AuthMethod::Guest => self.api.guest_login().await,
            AuthMethod::Login | AuthMethod::Register => {
                let credentials = request
                    .credentials
                    .as_ref()
                    .filter(|c| c.is_complete())
                    .ok_or(AuthError::MissingCredentials)?;

                if request.method == AuthMethod::Register {
                    self.api
                        .register(
                            credentials.name.as_deref(),
                            &credentials.email,
                            &credentials.password,
                        )
                        .await
                } else {
                    self.api
                        .login(&credentials.email, &credentials.password)
                        .await
                }
            }
        }
        .map_err(|e| {
            warn!(method = %request.method, error = %e, "Authentication request failed");
            AuthError::from(e)
        })?;

        let (user_id, email) = match outcome {
            AuthOutcome::Authenticated { user_id, email } => (user_id, email),
            // Guest access only fails on transport; a reported error is
            // ignored as long as an id came back.
            AuthOutcome::Rejected {
                message,
                user_id: Some(user_id),
            } if request.method == AuthMethod::Guest => {
                warn!(%message, "Server reported an error on guest access, continuing");
                (user_id, None)
            }
            AuthOutcome::Rejected { message, .. } if request.method == AuthMethod::Guest => {
                warn!(%message, "Guest response carried no user id");
                return Err(ApiError::decode("guest response has no user_id").into());
            }
            AuthOutcome::Rejected { message, .. } => {
                warn!(method = %request.method, %message, "Server rejected authentication");
                return Err(AuthError::rejected(message));
            }
        };

        if request.method == AuthMethod::Guest {
            info!(%user_id, "Started guest session");
            return Ok(AuthResponse {
                session: Session::guest(user_id),
                email,
                persisted: false,
            });
        }

        info!(%user_id, method = %request.method, "Successfully authenticated");

        let persisted = if request.persist {
            match self.storage.store_user_id(&user_id).await {
                Ok(()) => {
                    info!("Session persisted");
                    true
                }
                Err(e) => {
                    error!(error = %e, "Failed to persist session");
                    false
                }
            }
        } else {
            debug!("Session persistence disabled, skipping storage");
            false
        };

        Ok(AuthResponse {
            session: Session::authenticated(user_id),
            email,
            persisted,
        })
    }

    /// Clears the persisted session.
    ///
    /// # Errors
    /// Returns error if the stored state cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        debug!("Clearing persisted session");
        match self.storage.clear().await {
            Ok(()) => {
                info!("Persisted session cleared");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to clear persisted session");
                Err(e.into())
            }
        }
    }
}
