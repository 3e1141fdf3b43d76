//! Domain layer for the hotel reservations backend.
//!
//! This crate contains:
//! - Domain models and request/response payloads (users, clients, rooms, reservations)
//! - Pure business rules: reservation validity, pricing, availability, registration
//! - Field-keyed validation errors

pub mod errors;
pub mod models;
pub mod services;

pub use errors::{FieldError, FieldErrors, NON_FIELD_ERRORS};
