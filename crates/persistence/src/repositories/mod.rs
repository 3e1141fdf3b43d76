//! Repository implementations for database operations.
//!
//! Reads go through the pool held by each repository. Steps that must share
//! a transaction are associated functions taking `&mut PgConnection`.

pub mod client;
pub mod reservation;
pub mod room;
pub mod user;

pub use client::{ClientRepository, NewClient};
pub use reservation::{NewReservation, ReservationRepository};
pub use room::{NewRoom, RoomRepository};
pub use user::{NewUser, UserRepository};
