//! Availability search: query parsing and quoting.

use chrono::NaiveDate;
use std::str::FromStr;
use thiserror::Error;

use crate::models::availability::{
    AvailabilityCriteria, AvailabilityQuery, AvailabilityResponse, AvailableRoom,
};
use crate::models::room::{Room, RoomType};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reasons a search is rejected before touching inventory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvailabilityError {
    #[error("date_in and date_out parameters are required")]
    MissingDates,

    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidDate,

    #[error("guests must be a positive integer")]
    InvalidGuests,

    #[error("Invalid room_type. Use one of: single, double, twin, suit, deluxe")]
    InvalidRoomType,

    #[error("date_out must be after date_in")]
    DateOrder,

    #[error("date_in cannot be in the past")]
    DateInPast,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Validates the raw query against `today` (UTC calendar date).
pub fn parse_criteria(
    query: &AvailabilityQuery,
    today: NaiveDate,
) -> Result<AvailabilityCriteria, AvailabilityError> {
    let (Some(date_in), Some(date_out)) = (present(&query.date_in), present(&query.date_out)) else {
        return Err(AvailabilityError::MissingDates);
    };

    let date_in = NaiveDate::parse_from_str(date_in, DATE_FORMAT)
        .map_err(|_| AvailabilityError::InvalidDate)?;
    let date_out = NaiveDate::parse_from_str(date_out, DATE_FORMAT)
        .map_err(|_| AvailabilityError::InvalidDate)?;

    let guests = match present(&query.guests) {
        None => 1,
        Some(raw) => match raw.parse::<i32>() {
            Ok(n) if n >= 1 => n,
            _ => return Err(AvailabilityError::InvalidGuests),
        },
    };

    let room_type = present(&query.room_type)
        .map(RoomType::from_str)
        .transpose()
        .map_err(|_| AvailabilityError::InvalidRoomType)?;

    if date_out <= date_in {
        return Err(AvailabilityError::DateOrder);
    }
    if date_in < today {
        return Err(AvailabilityError::DateInPast);
    }

    Ok(AvailabilityCriteria {
        date_in,
        date_out,
        guests,
        room_type,
    })
}

/// Builds the response from rooms that are available, large enough, of the
/// requested type and free for the whole stay.
pub fn quote(criteria: &AvailabilityCriteria, rooms: Vec<Room>) -> AvailabilityResponse {
    let nights = criteria.nights();
    let available_rooms: Vec<AvailableRoom> = rooms
        .into_iter()
        .map(|room| AvailableRoom::quote(room, nights))
        .collect();

    AvailabilityResponse {
        date_in: criteria.date_in,
        date_out: criteria.date_out,
        guests: criteria.guests,
        total_available: available_rooms.len(),
        available_rooms,
    }
}
