//! Availability search payloads.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::room::{Room, RoomType};

/// Raw query string of `GET /api/v1/room/availability`.
///
/// Kept as strings so malformed values produce the search's own messages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub date_in: Option<String>,
    pub date_out: Option<String>,
    pub guests: Option<String>,
    pub room_type: Option<String>,
}

/// Validated search criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityCriteria {
    pub date_in: NaiveDate,
    pub date_out: NaiveDate,
    pub guests: i32,
    pub room_type: Option<RoomType>,
}

impl AvailabilityCriteria {
    pub fn nights(&self) -> i64 {
        (self.date_out - self.date_in).num_days()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailableRoom {
    pub room_id: i64,
    pub room_number: i32,
    pub room_type: RoomType,
    pub capacity: i32,
    pub price_per_night: Decimal,
    pub total_price: Decimal,
    pub nights: i64,
    pub description: String,
    pub amenities: serde_json::Value,
}

impl AvailableRoom {
    pub fn quote(room: Room, nights: i64) -> Self {
        Self {
            room_id: room.id,
            room_number: room.number,
            room_type: room.room_type,
            capacity: room.capacity,
            price_per_night: room.price_for_night,
            total_price: crate::services::reservation_rules::stay_price(
                room.price_for_night,
                nights,
            ),
            nights,
            description: room.description,
            amenities: room.amenities,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub date_in: NaiveDate,
    pub date_out: NaiveDate,
    pub guests: i32,
    pub available_rooms: Vec<AvailableRoom>,
    pub total_available: usize,
}
