//! Reservation validity and pricing rules.
//!
//! Rules are checked in a fixed order:
//! 1. departure strictly after arrival (`date_out`)
//! 2. at least one guest (`number_of_guests`)
//! 3. no pending/confirmed stay on the room overlapping `[date_in, date_out)` (`non_field_errors`)
//! 4. room status is available (`room`)
//! 5. guests within room capacity (`number_of_guests`)
//!
//! Rules 1 and 2 are reported together. Rules 3-5 need the room and the
//! overlap lookup, run only after 1 and 2 pass, and stop at the first failure.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::FieldErrors;
use crate::models::reservation::ReservationStatus;
use crate::models::room::{max_price, Room, RoomStatus};

pub const DEPARTURE_BEFORE_ARRIVAL: &str = "The departure date must be after the arrival date.";
pub const NOT_ENOUGH_GUESTS: &str = "The number of guests must be at least 1.";
pub const DATES_UNAVAILABLE: &str = "The room is not available for the selected dates.";
pub const PRICE_TOO_LARGE: &str = "Ensure that there are no more than 8 digits in total.";

/// The values a reservation would have after the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingCandidate {
    pub date_in: NaiveDate,
    pub date_out: NaiveDate,
    pub number_of_guests: i32,
    pub status: ReservationStatus,
}

/// Rules 1 and 2.
pub fn check_dates_and_guests(candidate: &BookingCandidate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if candidate.date_out <= candidate.date_in {
        errors.push("date_out", DEPARTURE_BEFORE_ARRIVAL);
    }
    if candidate.number_of_guests < 1 {
        errors.push("number_of_guests", NOT_ENOUGH_GUESTS);
    }
    errors.into_result()
}

/// Whether the overlap lookup applies to this candidate at all.
pub fn needs_overlap_check(candidate: &BookingCandidate) -> bool {
    candidate.status.is_active()
}

/// Rules 3 to 5.
///
/// `has_overlap` is the result of the overlap lookup for the room (excluding
/// the reservation being updated). `check_room_status` is true when the room
/// is being booked now: on create, when an update moves to another room, or
/// when a cancelled reservation is made pending or confirmed again.
pub fn check_room_fit(
    candidate: &BookingCandidate,
    room: &Room,
    has_overlap: bool,
    check_room_status: bool,
) -> Result<(), FieldErrors> {
    if needs_overlap_check(candidate) && has_overlap {
        return Err(FieldErrors::non_field(DATES_UNAVAILABLE));
    }

    if check_room_status && room.status != RoomStatus::Available {
        return Err(FieldErrors::single(
            "room",
            format!(
                "The room is not available due to its current status: {}",
                room.status.label()
            ),
        ));
    }

    if candidate.number_of_guests > room.capacity {
        return Err(FieldErrors::single(
            "number_of_guests",
            format!(
                "The room capacity is {}, but you requested {} guests.",
                room.capacity, candidate.number_of_guests
            ),
        ));
    }

    Ok(())
}

/// Nightly rate times the number of nights.
pub fn stay_price(price_per_night: Decimal, nights: i64) -> Decimal {
    price_per_night * Decimal::from(nights)
}

/// Decides the total price to store.
///
/// A supplied price always wins. Otherwise an existing price is kept unless
/// `pricing_changed` (dates or room changed), in which case it is
/// recomputed from the room rate.
pub fn resolve_total_price(
    supplied: Option<Decimal>,
    existing: Option<Decimal>,
    pricing_changed: bool,
    price_per_night: Decimal,
    nights: i64,
) -> Result<Decimal, FieldErrors> {
    let price = match (supplied, existing) {
        (Some(p), _) => p,
        (None, Some(p)) if !pricing_changed => p,
        _ => stay_price(price_per_night, nights),
    };

    if price > max_price() {
        return Err(FieldErrors::single("total_price", PRICE_TOO_LARGE));
    }
    Ok(price)
}
