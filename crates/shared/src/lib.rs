//! Shared utilities for the hotel reservations backend.
//!
//! This crate provides functionality used across the other crates:
//! - Password hashing with Argon2id and the account password policy
//! - JWT access/refresh token issue and validation
//! - Reusable field validators for `validator` derives

pub mod jwt;
pub mod password;
pub mod validation;
