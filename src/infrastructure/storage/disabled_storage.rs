//! Session storage used when persistence is turned off.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::StorageError;
use crate::domain::ports::SessionStoragePort;

/// Storage that remembers nothing.
pub struct DisabledSessionStorage;

impl DisabledSessionStorage {
    /// Creates new disabled storage.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for DisabledSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStoragePort for DisabledSessionStorage {
    async fn load_user_id(&self) -> Result<Option<String>, StorageError> {
        debug!("Session persistence disabled - nothing to load");
        Ok(None)
    }

    async fn store_user_id(&self, _user_id: &str) -> Result<(), StorageError> {
        debug!("Session persistence disabled - not storing user id");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_never_remembers() {
        let storage = DisabledSessionStorage::new();

        storage.store_user_id("u-1").await.unwrap();

        assert!(!storage.has_session().await.unwrap());
    }
}
