use auth::UserId;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Profile of the caller, read straight from the verified token claims.
pub async fn get_profile(caller: AuthenticatedUser) -> ApiSuccess<ProfileData> {
    let claims = caller.claims;

    ApiSuccess::new(
        StatusCode::OK,
        ProfileData {
            id: claims.user_id,
            username: claims.username,
            full_name: claims.full_name,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileData {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
}
