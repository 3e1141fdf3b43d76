//! Domain services for the hotel reservations backend.
//!
//! Services hold the business rules as pure functions; storage lookups are
//! passed in as plain values by the caller.

pub mod availability;
pub mod registration;
pub mod reservation_rules;

pub use availability::{parse_criteria, quote, AvailabilityError};
pub use reservation_rules::{
    check_dates_and_guests, check_room_fit, resolve_total_price, stay_price,
    BookingCandidate,
};
