//! Room inventory domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

/// Amenity flags every room must declare.
pub const REQUIRED_AMENITIES: [&str; 6] = [
    "wifi",
    "air_conditioning",
    "minibar",
    "jacuzzi",
    "tv",
    "breakfast_included",
];

/// Largest value a NUMERIC(8,2) column holds.
pub fn max_price() -> Decimal {
    Decimal::new(99_999_999, 2)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    #[default]
    Single,
    Double,
    Twin,
    Suit,
    Deluxe,
}

impl RoomType {
    pub const ALL: [RoomType; 5] = [
        RoomType::Single,
        RoomType::Double,
        RoomType::Twin,
        RoomType::Suit,
        RoomType::Deluxe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Single => "single",
            RoomType::Double => "double",
            RoomType::Twin => "twin",
            RoomType::Suit => "suit",
            RoomType::Deluxe => "deluxe",
        }
    }
}

impl FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(RoomType::Single),
            "double" => Ok(RoomType::Double),
            "twin" => Ok(RoomType::Twin),
            "suit" => Ok(RoomType::Suit),
            "deluxe" => Ok(RoomType::Deluxe),
            _ => Err(format!("\"{}\" is not a valid room type.", s)),
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Available,
    Reserved,
    Cleaning,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Reserved => "reserved",
            RoomStatus::Cleaning => "cleaning",
            RoomStatus::Maintenance => "maintenance",
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::Available => "Available",
            RoomStatus::Reserved => "Reserved",
            RoomStatus::Cleaning => "Cleaning",
            RoomStatus::Maintenance => "Maintenance",
        }
    }
}

impl FromStr for RoomStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(RoomStatus::Available),
            "reserved" => Ok(RoomStatus::Reserved),
            "cleaning" => Ok(RoomStatus::Cleaning),
            "maintenance" => Ok(RoomStatus::Maintenance),
            _ => Err(format!("\"{}\" is not a valid room status.", s)),
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub number: i32,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub price_for_night: Decimal,
    pub is_reserved: bool,
    pub status: RoomStatus,
    pub description: String,
    pub capacity: i32,
    pub amenities: serde_json::Value,
}

impl Room {
    /// Applies a partial update in place.
    pub fn apply(&mut self, update: UpdateRoomRequest) {
        if let Some(v) = update.number {
            self.number = v;
        }
        if let Some(v) = update.room_type {
            self.room_type = v;
        }
        if let Some(v) = update.price_for_night {
            self.price_for_night = v;
        }
        if let Some(v) = update.is_reserved {
            self.is_reserved = v;
        }
        if let Some(v) = update.status {
            self.status = v;
        }
        if let Some(v) = update.description {
            self.description = v;
        }
        if let Some(v) = update.capacity {
            self.capacity = v;
        }
        if let Some(v) = update.amenities {
            self.amenities = v;
        }
    }
}

/// Amenities must be an object carrying every required flag as a boolean.
/// Extra keys are kept as-is.
pub fn validate_amenities(amenities: &serde_json::Value) -> Result<(), ValidationError> {
    let Some(map) = amenities.as_object() else {
        let mut err = ValidationError::new("amenities_type");
        err.message = Some("Amenities must be an object.".into());
        return Err(err);
    };

    let missing: Vec<&str> = REQUIRED_AMENITIES
        .iter()
        .copied()
        .filter(|key| !map.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        let mut err = ValidationError::new("amenities_missing");
        err.message = Some(format!("Missing required amenities: {}.", missing.join(", ")).into());
        return Err(err);
    }

    let non_boolean: Vec<&str> = REQUIRED_AMENITIES
        .iter()
        .copied()
        .filter(|key| !map.get(*key).map(|v| v.is_boolean()).unwrap_or(false))
        .collect();
    if !non_boolean.is_empty() {
        let mut err = ValidationError::new("amenities_not_boolean");
        err.message = Some(format!("Amenities must be true or false: {}.", non_boolean.join(", ")).into());
        return Err(err);
    }

    Ok(())
}

/// Non-negative, at most two decimal places, fits NUMERIC(8,2).
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut err = ValidationError::new("price_negative");
        err.message = Some("Ensure this value is greater than or equal to 0.".into());
        return Err(err);
    }
    if price.normalize().scale() > 2 {
        let mut err = ValidationError::new("price_scale");
        err.message = Some("Ensure that there are no more than 2 decimal places.".into());
        return Err(err);
    }
    if *price > max_price() {
        let mut err = ValidationError::new("price_digits");
        err.message = Some("Ensure that there are no more than 8 digits in total.".into());
        return Err(err);
    }
    Ok(())
}

fn default_amenities() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Request payload for creating a room.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoomRequest {
    pub number: i32,

    #[serde(rename = "type", default)]
    pub room_type: RoomType,

    #[validate(custom(function = "crate::models::room::validate_price"))]
    pub price_for_night: Decimal,

    #[serde(default)]
    pub is_reserved: bool,

    #[serde(default)]
    pub status: RoomStatus,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 1, message = "Ensure this value is greater than or equal to 1."))]
    pub capacity: i32,

    #[serde(default = "default_amenities")]
    #[validate(custom(function = "crate::models::room::validate_amenities"))]
    pub amenities: serde_json::Value,
}

/// Request payload for updating a room (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRoomRequest {
    pub number: Option<i32>,

    #[serde(rename = "type")]
    pub room_type: Option<RoomType>,

    #[validate(custom(function = "crate::models::room::validate_price"))]
    pub price_for_night: Option<Decimal>,

    pub is_reserved: Option<bool>,

    pub status: Option<RoomStatus>,

    pub description: Option<String>,

    #[validate(range(min = 1, message = "Ensure this value is greater than or equal to 1."))]
    pub capacity: Option<i32>,

    #[validate(custom(function = "crate::models::room::validate_amenities"))]
    pub amenities: Option<serde_json::Value>,
}

impl From<CreateRoomRequest> for UpdateRoomRequest {
    fn from(req: CreateRoomRequest) -> Self {
        Self {
            number: Some(req.number),
            room_type: Some(req.room_type),
            price_for_night: Some(req.price_for_night),
            is_reserved: Some(req.is_reserved),
            status: Some(req.status),
            description: Some(req.description),
            capacity: Some(req.capacity),
            amenities: Some(req.amenities),
        }
    }
}

/// Rooms serialize exactly as stored.
pub type RoomResponse = Room;
