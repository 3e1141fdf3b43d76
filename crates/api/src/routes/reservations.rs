//! Reservation endpoints.
//!
//! Staff create, edit and delete reservations. Regular users only read
//! reservations of their own client profile.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::reservation::{
    CreateReservationRequest, ReservationResponse, UpdateReservationRequest,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminUser, ApiJson, ApiPath, UserAuth};
use crate::services::booking::BookingService;

/// GET /api/v1/reservation
pub async fn list_reservations(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    let reservations = BookingService::new(state.pool.clone()).list(&auth).await?;
    Ok(Json(reservations))
}

/// GET /api/v1/reservation/my_reservations
pub async fn my_reservations(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    let reservations = BookingService::new(state.pool.clone())
        .my_reservations(&auth)
        .await?;
    Ok(Json(reservations))
}

/// POST /api/v1/reservation
pub async fn create_reservation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(request): ApiJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), ApiError> {
    let reservation = BookingService::new(state.pool.clone())
        .create(request, admin.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /api/v1/reservation/:id
pub async fn get_reservation(
    State(state): State<AppState>,
    auth: UserAuth,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let reservation = BookingService::new(state.pool.clone()).get(&auth, id).await?;
    Ok(Json(reservation))
}

/// PUT /api/v1/reservation/:id
pub async fn replace_reservation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<CreateReservationRequest>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let reservation = BookingService::new(state.pool.clone())
        .update(id, request.into(), admin.user_id)
        .await?;
    Ok(Json(reservation))
}

/// PATCH /api/v1/reservation/:id
pub async fn update_reservation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateReservationRequest>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let reservation = BookingService::new(state.pool.clone())
        .update(id, request, admin.user_id)
        .await?;
    Ok(Json(reservation))
}

/// DELETE /api/v1/reservation/:id
pub async fn delete_reservation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    BookingService::new(state.pool.clone())
        .delete(id, admin.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
