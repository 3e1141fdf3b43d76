//! Custom Axum extractors.
//!
//! Extractors for parsing request data and resolving the caller.

pub mod request;
pub mod user_auth;

pub use request::{ApiJson, ApiPath, ApiQuery};
pub use user_auth::{AdminUser, UserAuth};
