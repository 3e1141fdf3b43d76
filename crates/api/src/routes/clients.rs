//! Client profile endpoints.
//!
//! Staff manage every profile; a regular user creates their own profile
//! once and may read or edit only that one.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::client::{ClientResponse, CreateClientRequest, UpdateClientRequest};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminUser, ApiJson, ApiPath, UserAuth};
use crate::services::clients::ClientService;

/// GET /api/v1/client
pub async fn list_clients(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ClientResponse>>, ApiError> {
    let clients = ClientService::new(state.pool.clone()).list().await?;
    Ok(Json(clients))
}

/// POST /api/v1/client
pub async fn create_client(
    State(state): State<AppState>,
    auth: UserAuth,
    ApiJson(request): ApiJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>), ApiError> {
    let client = ClientService::new(state.pool.clone())
        .create(&auth, request)
        .await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/v1/client/:id
pub async fn get_client(
    State(state): State<AppState>,
    auth: UserAuth,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ClientResponse>, ApiError> {
    let client = ClientService::new(state.pool.clone()).get(&auth, id).await?;
    Ok(Json(client))
}

/// PUT /api/v1/client/:id
///
/// Every field is required, as on create.
pub async fn replace_client(
    State(state): State<AppState>,
    auth: UserAuth,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<CreateClientRequest>,
) -> Result<Json<ClientResponse>, ApiError> {
    let client = ClientService::new(state.pool.clone())
        .update(&auth, id, request.into())
        .await?;
    Ok(Json(client))
}

/// PATCH /api/v1/client/:id
pub async fn update_client(
    State(state): State<AppState>,
    auth: UserAuth,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, ApiError> {
    let client = ClientService::new(state.pool.clone())
        .update(&auth, id, request)
        .await?;
    Ok(Json(client))
}

/// DELETE /api/v1/client/:id
pub async fn delete_client(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    ClientService::new(state.pool.clone())
        .delete(&admin, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
