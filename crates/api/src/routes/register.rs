//! Account registration and the admin view of accounts.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::user::{RegisterRequest, RegisterResponse, UserResponse};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminUser, ApiJson, ApiPath};
use crate::services::registration::RegistrationService;

/// Register an account, optionally with its client profile.
///
/// POST /api/v1/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let response = RegistrationService::new(state.pool.clone())
        .register(request)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/register
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = RegistrationService::new(state.pool.clone()).list().await?;
    Ok(Json(users))
}

/// GET /api/v1/register/:id
pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = RegistrationService::new(state.pool.clone()).get(id).await?;
    Ok(Json(user))
}

/// DELETE /api/v1/register/:id
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    RegistrationService::new(state.pool.clone())
        .delete(id, admin.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
