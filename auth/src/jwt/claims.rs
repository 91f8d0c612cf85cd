use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::models::User;
use crate::models::UserId;

/// Issuer stamped into every token.
pub const ISSUER: &str = "liliapi";

/// Lifetime of a freshly issued token.
pub const TOKEN_TTL: Duration = Duration::hours(24);

/// Remaining lifetime at or below which a token may be refreshed.
pub const REFRESH_WINDOW: Duration = Duration::hours(1);

/// Claims carried by an access token.
///
/// Timestamps are Unix seconds, as in RFC 7519.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub username: String,
    pub full_name: String,

    /// Expiration time
    pub exp: i64,

    /// Issued at
    pub iat: i64,

    /// Not before
    pub nbf: i64,

    pub iss: String,

    /// Subject, `user_<id>`
    pub sub: String,
}

/// Where a token sits in its lifetime at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLifecycle {
    NotYetValid,
    Valid,
    /// Still valid, with at most [`REFRESH_WINDOW`] left.
    ExpiringSoon,
    Expired,
}

impl TokenClaims {
    /// Build claims for a user, valid from `now` for [`TOKEN_TTL`].
    pub fn for_user(user: &User, now: DateTime<Utc>) -> Self {
        let issued_at = now.timestamp();

        Self {
            user_id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            exp: issued_at + TOKEN_TTL.num_seconds(),
            iat: issued_at,
            nbf: issued_at,
            iss: ISSUER.to_string(),
            sub: user.id.subject(),
        }
    }

    /// Time left until expiry; negative once expired.
    ///
    /// Saturates at [`Duration::MAX`] / [`Duration::MIN`] for timestamps
    /// beyond what a `Duration` can hold.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        let seconds = self.exp.saturating_sub(now.timestamp());

        Duration::try_seconds(seconds).unwrap_or(if seconds > 0 {
            Duration::MAX
        } else {
            Duration::MIN
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn is_not_yet_valid(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.nbf
    }

    pub fn lifecycle(&self, now: DateTime<Utc>) -> TokenLifecycle {
        if self.is_not_yet_valid(now) {
            TokenLifecycle::NotYetValid
        } else if self.is_expired(now) {
            TokenLifecycle::Expired
        } else if self.remaining(now) <= REFRESH_WINDOW {
            TokenLifecycle::ExpiringSoon
        } else {
            TokenLifecycle::Valid
        }
    }
}
