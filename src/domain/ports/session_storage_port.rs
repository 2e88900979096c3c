//! Session persistence port definition.

use async_trait::async_trait;

use crate::domain::errors::StorageError;

/// Port for persisting the signed-in user identifier across restarts.
#[async_trait]
pub trait SessionStoragePort: Send + Sync {
    /// Retrieves the stored user id.
    async fn load_user_id(&self) -> Result<Option<String>, StorageError>;

    /// Stores the user id.
    async fn store_user_id(&self, user_id: &str) -> Result<(), StorageError>;

    /// Removes any stored session state.
    async fn clear(&self) -> Result<(), StorageError>;

    /// Checks if a session is stored.
    async fn has_session(&self) -> Result<bool, StorageError> {
        Ok(self.load_user_id().await?.is_some())
    }
}
