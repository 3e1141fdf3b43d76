//! Token routes: login and refresh.

use axum::{extract::State, Json};
use domain::models::user::{LoginRequest, RefreshRequest, TokensResponse};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::services::AuthService;

/// Exchange username and password for a token pair.
///
/// POST /api/v1/auth/token
pub async fn token(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<TokensResponse>, ApiError> {
    request.validate()?;

    let tokens = AuthService::new(state.pool.clone(), &state.jwt)
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new token pair.
///
/// POST /api/v1/auth/token/refresh
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> Result<Json<TokensResponse>, ApiError> {
    request.validate()?;

    let tokens = AuthService::new(state.pool.clone(), &state.jwt)
        .refresh(&request.refresh_token)
        .await?;
    Ok(Json(tokens))
}
