use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn refresh_token<UR: UserRepository>(
    State(state): State<AppState<UR>>,
    Json(body): Json<RefreshTokenRequestBody>,
) -> Result<ApiSuccess<RefreshTokenResponseData>, ApiError> {
    if body.token.is_empty() {
        return Err(ApiError::BadRequest("Token is required".to_string()));
    }

    let token = state.auth_service.refresh_token(&body.token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RefreshTokenResponseData { token },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshTokenRequestBody {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshTokenResponseData {
    pub token: String,
}
