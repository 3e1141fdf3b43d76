//! Domain models for the hotel reservations backend.

pub mod availability;
pub mod client;
pub mod reservation;
pub mod room;
pub mod user;

pub use availability::{AvailabilityCriteria, AvailabilityQuery, AvailabilityResponse, AvailableRoom};
pub use client::Client;
pub use reservation::{Reservation, ReservationDetails, ReservationStatus};
pub use room::{Room, RoomStatus, RoomType};
pub use user::User;
