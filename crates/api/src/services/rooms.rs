//! Room inventory and the availability search.

use chrono::Utc;
use domain::models::room::{CreateRoomRequest, RoomResponse, UpdateRoomRequest};
use domain::models::{AvailabilityQuery, AvailabilityResponse, Room};
use domain::services::availability::{parse_criteria, quote};
use persistence::repositories::{NewRoom, RoomRepository};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

pub const ROOM_NOT_FOUND: &str = "Room not found";

pub struct RoomService {
    rooms: RoomRepository,
}

impl RoomService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            rooms: RoomRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<RoomResponse>, ApiError> {
        let rooms = self.rooms.list().await?;
        Ok(rooms.into_iter().map(Room::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<RoomResponse, ApiError> {
        self.rooms
            .find_by_id(id)
            .await?
            .map(Room::from)
            .ok_or_else(|| ApiError::NotFound(ROOM_NOT_FOUND.to_string()))
    }

    pub async fn create(&self, req: CreateRoomRequest, created_by: Uuid) -> Result<RoomResponse, ApiError> {
        req.validate()?;

        let created: Room = self
            .rooms
            .create(&NewRoom {
                number: req.number,
                room_type: req.room_type,
                price_for_night: req.price_for_night,
                is_reserved: req.is_reserved,
                status: req.status,
                description: &req.description,
                capacity: req.capacity,
                amenities: &req.amenities,
            })
            .await?
            .into();

        tracing::info!(
            room_id = created.id,
            number = created.number,
            created_by = %created_by,
            "Room created"
        );
        Ok(created)
    }

    /// Applies a full (`PUT`) or partial (`PATCH`) update.
    pub async fn update(
        &self,
        id: i64,
        update: UpdateRoomRequest,
        updated_by: Uuid,
    ) -> Result<RoomResponse, ApiError> {
        update.validate()?;

        let mut room = self.get(id).await?;
        room.apply(update);

        let updated: Room = self
            .rooms
            .update(id, &NewRoom::from(&room))
            .await?
            .ok_or_else(|| ApiError::NotFound(ROOM_NOT_FOUND.to_string()))?
            .into();

        tracing::info!(room_id = id, status = %updated.status, updated_by = %updated_by, "Room updated");
        Ok(updated)
    }

    /// Deletes a room together with its reservations.
    pub async fn delete(&self, id: i64, deleted_by: Uuid) -> Result<(), ApiError> {
        if !self.rooms.delete(id).await? {
            return Err(ApiError::NotFound(ROOM_NOT_FOUND.to_string()));
        }
        tracing::info!(room_id = id, deleted_by = %deleted_by, "Room deleted");
        Ok(())
    }

    /// Rooms bookable for the whole requested stay, with their quoted price.
    pub async fn availability(&self, query: &AvailabilityQuery) -> Result<AvailabilityResponse, ApiError> {
        let criteria = parse_criteria(query, Utc::now().date_naive())
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let rooms = self.rooms.find_available(&criteria).await?;
        let response = quote(&criteria, rooms.into_iter().map(Room::from).collect());

        tracing::debug!(
            date_in = %criteria.date_in,
            date_out = %criteria.date_out,
            guests = criteria.guests,
            total_available = response.total_available,
            "Availability searched"
        );
        Ok(response)
    }
}
