use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service over `repository`.
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .get_by_username(command.username.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::UsernameAlreadyExists(
                command.username.as_str().to_string(),
            ));
        }

        let password_hash = self
            .password_hasher
            .hash_async(command.password.expose().to_string())
            .await?;

        let created_user = self
            .repository
            .create(NewUser {
                username: command.username,
                password_hash,
                full_name: command.full_name,
            })
            .await?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User created"
        );

        Ok(created_user)
    }
}

#[cfg(test)]
mod tests {
    use auth::StoreError;
    use auth::UserId;
    use auth::UserStore;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::user::models::FullName;
    use crate::domain::user::models::Password;
    use crate::domain::user::models::Username;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserStore for TestUserRepository {
            async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
        }

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
        }
    }

    fn command(username: &str) -> CreateUserCommand {
        CreateUserCommand::new(
            Username::new(username.to_string()).unwrap(),
            Password::new("Secret123$".to_string()).unwrap(),
            FullName::new("Alice Liddell".to_string()).unwrap(),
        )
    }

    fn stored(user: NewUser) -> User {
        User {
            id: UserId(1),
            username: user.username.as_str().to_string(),
            password_hash: user.password_hash,
            full_name: user.full_name.as_str().to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_get_by_username()
            .with(eq("alice"))
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "alice"
                    && user.full_name.as_str() == "Alice Liddell"
                    && user.password_hash.starts_with("$argon2id$v=19$m=65536,t=1,p=4$")
            })
            .times(1)
            .returning(|user| Ok(stored(user)));

        let service = UserService::new(Arc::new(repository));

        let user = service
            .create_user(command("alice"))
            .await
            .expect("Failed to create user");

        assert_eq!(user.id, UserId(1));
        assert_eq!(user.username, "alice");
        // Password is hashed with real Argon2
        assert!(auth::PasswordHasher::new().verify("Secret123$", &user.password_hash));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_get_by_username()
            .times(1)
            .returning(|_| {
                Ok(Some(User {
                    id: UserId(9),
                    username: "alice".to_string(),
                    password_hash: String::new(),
                    full_name: "Someone Else".to_string(),
                    created_at: Utc::now(),
                }))
            });
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service.create_user(command("alice")).await;
        assert!(matches!(
            result,
            Err(UserError::UsernameAlreadyExists(ref name)) if name == "alice"
        ));
    }

    #[tokio::test]
    async fn test_create_user_lost_race_on_insert() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_get_by_username()
            .returning(|_| Ok(None));
        repository.expect_create().times(1).returning(|user| {
            Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ))
        });

        let service = UserService::new(Arc::new(repository));

        let result = service.create_user(command("alice")).await;
        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_create_user_store_unavailable() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_get_by_username()
            .returning(|_| Err(StoreError::Unavailable("connection refused".to_string())));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service.create_user(command("alice")).await;
        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }
}
