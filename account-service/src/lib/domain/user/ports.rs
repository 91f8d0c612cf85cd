use async_trait::async_trait;
use auth::UserStore;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::user::errors::UserError;

/// Port for account service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated username, password and full name
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;
}

/// Persistence operations for users.
///
/// Extends the read-only [`UserStore`] consumed by the authentication core
/// with the writes needed for account management.
#[async_trait]
pub trait UserRepository: UserStore {
    /// Persist new user to storage.
    ///
    /// # Arguments
    /// * `user` - User to insert
    ///
    /// # Returns
    /// Created user entity with storage-assigned id and timestamp
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;
}
