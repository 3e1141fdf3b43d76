//! Reservation entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use domain::models::{Reservation, ReservationDetails, ReservationStatus, RoomType};

/// Database row mapping for the reservations table.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationEntity {
    pub id: i64,
    pub date_in: NaiveDate,
    pub date_out: NaiveDate,
    pub number_of_guests: i32,
    pub status: String,
    pub total_price: Option<Decimal>,
    pub client_id: i64,
    pub room_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReservationEntity> for Reservation {
    fn from(entity: ReservationEntity) -> Self {
        Self {
            id: entity.id,
            date_in: entity.date_in,
            date_out: entity.date_out,
            number_of_guests: entity.number_of_guests,
            status: ReservationStatus::from_str(&entity.status).unwrap_or_default(),
            total_price: entity.total_price,
            client_id: entity.client_id,
            room_id: entity.room_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Reservation row joined with its client and room.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationDetailsEntity {
    #[sqlx(flatten)]
    pub reservation: ReservationEntity,
    pub client_name: String,
    pub client_lastname: String,
    pub client_user_id: Option<Uuid>,
    pub room_number: i32,
    pub room_type: String,
    pub price_per_night: Decimal,
}

impl From<ReservationDetailsEntity> for ReservationDetails {
    fn from(entity: ReservationDetailsEntity) -> Self {
        Self {
            reservation: entity.reservation.into(),
            client_name: entity.client_name,
            client_lastname: entity.client_lastname,
            client_user_id: entity.client_user_id,
            room_number: entity.room_number,
            room_type: RoomType::from_str(&entity.room_type).unwrap_or_default(),
            price_per_night: entity.price_per_night,
        }
    }
}
