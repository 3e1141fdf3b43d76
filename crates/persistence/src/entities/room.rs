//! Room entity (database row mapping).

use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;

use domain::models::{RoomStatus, RoomType};

/// Database row mapping for the rooms table.
#[derive(Debug, Clone, FromRow)]
pub struct RoomEntity {
    pub id: i64,
    pub number: i32,
    #[sqlx(rename = "type")]
    pub room_type: String,
    pub price_for_night: Decimal,
    pub is_reserved: bool,
    pub status: String,
    pub description: String,
    pub capacity: i32,
    pub amenities: serde_json::Value,
}

impl From<RoomEntity> for domain::models::Room {
    fn from(entity: RoomEntity) -> Self {
        Self {
            id: entity.id,
            number: entity.number,
            // CHECK constraints keep both columns within the enum values
            room_type: RoomType::from_str(&entity.room_type).unwrap_or_default(),
            price_for_night: entity.price_for_night,
            is_reserved: entity.is_reserved,
            status: RoomStatus::from_str(&entity.status).unwrap_or_default(),
            description: entity.description,
            capacity: entity.capacity,
            amenities: entity.amenities,
        }
    }
}
