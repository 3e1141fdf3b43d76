//! HTTP route handlers.

pub mod auth;
pub mod clients;
pub mod health;
pub mod register;
pub mod reservations;
pub mod rooms;
