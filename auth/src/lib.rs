//! Credential and token lifecycle for liliapi
//!
//! - Password hashing (Argon2id, fixed cost policy)
//! - Access token issuance and validation (HMAC-signed JWT)
//! - Login, token refresh and validation over a [`UserStore`]
//!
//! Storage, transport and configuration live with the consuming service;
//! this crate only sees the [`UserStore`] port.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Secret123$").unwrap();
//! assert!(hasher.verify("Secret123$", &hash));
//! assert!(!hasher.verify("wrong", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenCodec, User, UserId};
//! use chrono::Utc;
//!
//! let codec = TokenCodec::new(b"testsecret").unwrap();
//! let user = User {
//!     id: UserId(1),
//!     username: "alice".to_string(),
//!     password_hash: String::new(),
//!     full_name: "Alice".to_string(),
//!     created_at: Utc::now(),
//! };
//! let now = Utc::now();
//! let token = codec.issue(&user, now).unwrap();
//! let claims = codec.validate(&token, now).unwrap();
//! assert_eq!(claims.sub, "user_1");
//! ```

pub mod jwt;
pub mod models;
pub mod password;
pub mod ports;
pub mod service;

// Re-export commonly used items
pub use jwt::TokenClaims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::TokenLifecycle;
pub use models::LoginResult;
pub use models::User;
pub use models::UserId;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use ports::StoreError;
pub use ports::UserStore;
pub use service::AuthError;
pub use service::AuthService;
