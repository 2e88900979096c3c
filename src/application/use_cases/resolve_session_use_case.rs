//! Session resolution use case.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::Session;
use crate::domain::errors::AuthError;
use crate::domain::ports::SessionStoragePort;

/// Restores a previously persisted session at startup.
pub struct ResolveSessionUseCase {
    storage: Arc<dyn SessionStoragePort>,
}

impl ResolveSessionUseCase {
    /// Creates new use case.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStoragePort>) -> Self {
        Self { storage }
    }

    /// Resolves the stored session, if any.
    ///
    /// A stored identifier is trusted without asking the server. Storage
    /// failures are treated as no session.
    ///
    /// # Errors
    /// Currently infallible; the signature leaves room for storage that
    /// must not be ignored.
    pub async fn execute(&self) -> Result<Option<Session>, AuthError> {
        debug!("Checking for persisted session");
        match self.storage.load_user_id().await {
            Ok(Some(user_id)) if !user_id.trim().is_empty() => {
                info!(%user_id, "Restored persisted session");
                Ok(Some(Session::authenticated(user_id)))
            }
            Ok(_) => {
                debug!("No persisted session found");
                Ok(None)
            }
            Err(e) => {
                debug!(error = %e, "Failed to read persisted session");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockSessionStorage;

    #[tokio::test]
    async fn test_restores_stored_user_as_authenticated() {
        let use_case = ResolveSessionUseCase::new(Arc::new(MockSessionStorage::with_user_id("u-9")));

        let session = use_case.execute().await.unwrap().unwrap();

        assert_eq!(session.user_id(), "u-9");
        assert!(!session.is_guest());
    }

    #[tokio::test]
    async fn test_empty_storage_yields_none() {
        let use_case = ResolveSessionUseCase::new(Arc::new(MockSessionStorage::new()));

        assert!(use_case.execute().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_id_ignored() {
        let use_case = ResolveSessionUseCase::new(Arc::new(MockSessionStorage::with_user_id(" ")));

        assert!(use_case.execute().await.unwrap().is_none());
    }
}
