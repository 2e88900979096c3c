//! Session storage backed by `state.toml`.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::errors::StorageError;
use crate::domain::ports::SessionStoragePort;
use crate::infrastructure::config::StorageManager;

/// Persists the user id in the state file next to the configuration.
pub struct StateFileSessionStorage {
    manager: StorageManager,
}

impl StateFileSessionStorage {
    /// Creates storage over the given manager.
    #[must_use]
    pub const fn new(manager: StorageManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl SessionStoragePort for StateFileSessionStorage {
    async fn load_user_id(&self) -> Result<Option<String>, StorageError> {
        debug!(dir = %self.manager.dir().display(), "Loading session state");

        self.manager.load_session().map_err(|e| {
            warn!(error = %e, "Failed to read state file");
            StorageError::ReadFailed(e.to_string())
        })
    }

    async fn store_user_id(&self, user_id: &str) -> Result<(), StorageError> {
        debug!("Storing session state");

        self.manager.save_session(user_id).map_err(|e| {
            warn!(error = %e, "Failed to write state file");
            StorageError::WriteFailed(e.to_string())
        })
    }

    async fn clear(&self) -> Result<(), StorageError> {
        debug!("Removing session state");

        self.manager.clear_session().map_err(|e| {
            warn!(error = %e, "Failed to remove state file");
            StorageError::ClearFailed(e.to_string())
        })
    }
}
