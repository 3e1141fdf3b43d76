//! Reservation domain model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::room::{validate_price, RoomType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    /// Statuses that hold the room.
    pub const ACTIVE: [ReservationStatus; 2] =
        [ReservationStatus::Pending, ReservationStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            _ => Err(format!("\"{}\" is not a valid reservation status.", s)),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub date_in: NaiveDate,
    pub date_out: NaiveDate,
    pub number_of_guests: i32,
    pub status: ReservationStatus,
    pub total_price: Option<Decimal>,
    pub client_id: i64,
    pub room_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn nights(&self) -> i64 {
        (self.date_out - self.date_in).num_days()
    }
}

/// A reservation with the client and room fields shown alongside it.
#[derive(Debug, Clone)]
pub struct ReservationDetails {
    pub reservation: Reservation,
    pub client_name: String,
    pub client_lastname: String,
    pub client_user_id: Option<uuid::Uuid>,
    pub room_number: i32,
    pub room_type: RoomType,
    pub price_per_night: Decimal,
}

fn default_guests() -> i32 {
    1
}

/// Request payload for creating a reservation.
///
/// Date and guest rules need the room, so they are checked by
/// [`crate::services::reservation_rules`] rather than field validators.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReservationRequest {
    pub date_in: NaiveDate,
    pub date_out: NaiveDate,
    #[serde(default = "default_guests")]
    pub number_of_guests: i32,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    pub client: i64,
    pub room: i64,
}

/// Request payload for updating a reservation (partial update).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReservationRequest {
    pub date_in: Option<NaiveDate>,
    pub date_out: Option<NaiveDate>,
    pub number_of_guests: Option<i32>,
    pub status: Option<ReservationStatus>,
    pub total_price: Option<Decimal>,
    pub client: Option<i64>,
    pub room: Option<i64>,
}

impl From<CreateReservationRequest> for UpdateReservationRequest {
    fn from(req: CreateReservationRequest) -> Self {
        Self {
            date_in: Some(req.date_in),
            date_out: Some(req.date_out),
            number_of_guests: Some(req.number_of_guests),
            status: Some(req.status),
            total_price: req.total_price,
            client: Some(req.client),
            room: Some(req.room),
        }
    }
}

/// Checks an explicitly supplied total price.
pub fn validate_total_price(price: Option<&Decimal>) -> Result<(), validator::ValidationError> {
    match price {
        Some(p) => validate_price(p),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationResponse {
    pub id: i64,
    pub date_in: NaiveDate,
    pub date_out: NaiveDate,
    pub number_of_guests: i32,
    pub status: ReservationStatus,
    pub total_price: Option<Decimal>,
    pub client: i64,
    pub room: i64,
    pub client_name: String,
    pub client_lastname: String,
    pub room_number: i32,
    pub room_type: RoomType,
    pub price_per_night: Decimal,
    pub total_nights: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReservationDetails> for ReservationResponse {
    fn from(d: ReservationDetails) -> Self {
        let r = d.reservation;
        Self {
            total_nights: r.nights(),
            id: r.id,
            date_in: r.date_in,
            date_out: r.date_out,
            number_of_guests: r.number_of_guests,
            status: r.status,
            total_price: r.total_price,
            client: r.client_id,
            room: r.room_id,
            client_name: d.client_name,
            client_lastname: d.client_lastname,
            room_number: d.room_number,
            room_type: d.room_type,
            price_per_night: d.price_per_night,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
