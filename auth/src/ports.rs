use async_trait::async_trait;
use thiserror::Error;

use crate::models::User;

/// Error for user store operations.
///
/// "Not found" is not an error; stores return `Ok(None)` for it.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("User store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to registered users, consumed by the authentication core.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Retrieve user by exact (case-sensitive) username.
    ///
    /// # Arguments
    /// * `username` - Username to search for
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Storage could not be reached or queried
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}
