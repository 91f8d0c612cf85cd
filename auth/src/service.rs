use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

use crate::jwt::TokenClaims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::jwt::TokenLifecycle;
use crate::models::LoginResult;
use crate::password::argon2::DUMMY_PASSWORD_HASH;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::ports::StoreError;
use crate::ports::UserStore;

/// Authentication operation errors.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Unknown user or wrong password; the two are never distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Token still valid, refresh not needed")]
    RefreshNotNeeded,

    #[error("User not found")]
    UserNotFound,

    #[error("User store unavailable")]
    StoreUnavailable(#[source] StoreError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::StoreUnavailable(err)
    }
}

/// Authentication service combining the user store, password verification
/// and token issuance.
///
/// Stateless apart from the token key material; share it behind an `Arc`.
pub struct AuthService<S>
where
    S: UserStore,
{
    store: Arc<S>,
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

impl<S> AuthService<S>
where
    S: UserStore,
{
    /// Create a new authentication service.
    ///
    /// # Arguments
    /// * `store` - User lookup implementation
    /// * `token_codec` - Codec holding the token signing secret
    pub fn new(store: Arc<S>, token_codec: TokenCodec) -> Self {
        Self {
            store,
            password_hasher: PasswordHasher::new(),
            token_codec,
        }
    }

    /// Verify credentials and issue a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `StoreUnavailable` - User lookup failed
    /// * `Password` - Password verification could not run
    /// * `Token` - Token signing failed
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        self.login_at(username, password, Utc::now()).await
    }

    pub async fn login_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginResult, AuthError> {
        let user = match self.store.get_by_username(username).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed during login");
                return Err(e.into());
            }
        };

        // Unknown users are checked against a dummy hash so that both
        // rejections cost one derivation.
        let encoded = user
            .as_ref()
            .map_or(DUMMY_PASSWORD_HASH, |user| user.password_hash.as_str())
            .to_string();
        let verified = self
            .password_hasher
            .check_async(password.to_string(), encoded)
            .await;

        let user = match (user, verified) {
            (Some(user), Ok(true)) => user,
            (Some(user), Err(PasswordError::MalformedHash(reason))) => {
                tracing::error!(
                    user_id = %user.id,
                    error = %reason,
                    "Stored credential is corrupt"
                );
                return Err(AuthError::InvalidCredentials);
            }
            (_, Err(e @ PasswordError::HashingFailed(_))) => {
                tracing::error!(error = %e, "Password verification failed");
                return Err(e.into());
            }
            _ => {
                tracing::warn!(username = %username, "Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.token_codec.issue(&user, now)?;
        tracing::info!(user_id = %user.id, "Login succeeded");

        Ok(LoginResult { user, token })
    }

    /// Exchange a token close to expiry for a fresh one.
    ///
    /// Only tokens with one hour or less remaining are refreshed. The new
    /// token is built from the stored user, not from the old claims.
    ///
    /// # Errors
    /// * `Token` - The presented token failed validation
    /// * `RefreshNotNeeded` - More than one hour of validity remains
    /// * `UserNotFound` - The token's user no longer exists
    /// * `StoreUnavailable` - User lookup failed
    pub async fn refresh_token(&self, token: &str) -> Result<String, AuthError> {
        self.refresh_token_at(token, Utc::now()).await
    }

    pub async fn refresh_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = self.token_codec.validate(token, now)?;

        if claims.lifecycle(now) != TokenLifecycle::ExpiringSoon {
            return Err(AuthError::RefreshNotNeeded);
        }

        let user = self
            .store
            .get_by_username(&claims.username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let token = self.token_codec.issue(&user, now)?;
        tracing::info!(user_id = %user.id, "Token refreshed");

        Ok(token)
    }

    /// Validate a bearer token and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.validate_token_at(token, Utc::now())
    }

    pub fn validate_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenError> {
        self.token_codec.validate(token, now)
    }
}
