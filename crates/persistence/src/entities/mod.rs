//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod client;
pub mod reservation;
pub mod room;
pub mod user;

pub use client::ClientEntity;
pub use reservation::{ReservationDetailsEntity, ReservationEntity};
pub use room::RoomEntity;
pub use user::UserEntity;
