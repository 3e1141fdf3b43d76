//! Room inventory endpoints and the availability search.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::room::{CreateRoomRequest, RoomResponse, UpdateRoomRequest};
use domain::models::{AvailabilityQuery, AvailabilityResponse};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminUser, ApiJson, ApiPath, ApiQuery, UserAuth};
use crate::services::rooms::RoomService;

/// GET /api/v1/room
pub async fn list_rooms(
    State(state): State<AppState>,
    _auth: UserAuth,
) -> Result<Json<Vec<RoomResponse>>, ApiError> {
    let rooms = RoomService::new(state.pool.clone()).list().await?;
    Ok(Json(rooms))
}

/// POST /api/v1/room
pub async fn create_room(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(request): ApiJson<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>), ApiError> {
    let room = RoomService::new(state.pool.clone())
        .create(request, admin.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /api/v1/room/:id
pub async fn get_room(
    State(state): State<AppState>,
    _auth: UserAuth,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<RoomResponse>, ApiError> {
    let room = RoomService::new(state.pool.clone()).get(id).await?;
    Ok(Json(room))
}

/// PUT /api/v1/room/:id
pub async fn replace_room(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<CreateRoomRequest>,
) -> Result<Json<RoomResponse>, ApiError> {
    let room = RoomService::new(state.pool.clone())
        .update(id, request.into(), admin.user_id)
        .await?;
    Ok(Json(room))
}

/// PATCH /api/v1/room/:id
pub async fn update_room(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateRoomRequest>,
) -> Result<Json<RoomResponse>, ApiError> {
    let room = RoomService::new(state.pool.clone())
        .update(id, request, admin.user_id)
        .await?;
    Ok(Json(room))
}

/// DELETE /api/v1/room/:id
pub async fn delete_room(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    RoomService::new(state.pool.clone())
        .delete(id, admin.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Rooms free for a stay.
///
/// GET /api/v1/room/availability?date_in=YYYY-MM-DD&date_out=YYYY-MM-DD&guests=N&room_type=T
pub async fn availability(
    State(state): State<AppState>,
    _auth: UserAuth,
    ApiQuery(query): ApiQuery<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let response = RoomService::new(state.pool.clone())
        .availability(&query)
        .await?;
    Ok(Json(response))
}
