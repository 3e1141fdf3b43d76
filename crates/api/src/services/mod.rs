//! Application services.
//!
//! Services own transactions: they call the repositories, apply the domain
//! rules and return response DTOs or [`crate::error::ApiError`].

pub mod admin_bootstrap;
pub mod auth;
pub mod booking;
pub mod clients;
pub mod registration;
pub mod rooms;

pub use auth::{AuthError, AuthService};
