//! Field validators shared by request DTOs.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::password::check_password_policy;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+[1-9][0-9]{6,14}$").unwrap();
}

pub const MIN_USERNAME_LENGTH: usize = 3;

fn error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let message: String = message.into();
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Usernames are at least three letters or digits, nothing else.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(error(
            "username_too_short",
            "Username must be at least 3 characters long.",
        ));
    }
    if !username.chars().all(char::is_alphanumeric) {
        return Err(error(
            "username_not_alphanumeric",
            "Username can only contain letters and numbers.",
        ));
    }
    Ok(())
}

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    check_password_policy(password).map_err(|violation| error(violation.code(), violation.to_string()))
}

pub fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(error("email_format", "Enter a valid email address."))
    }
}

/// Phone numbers are stored in E.164 form, e.g. `+14155550123`.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() || PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        Err(error("phone_format", "Enter a valid phone number."))
    }
}

/// Rejects values that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "This field may not be blank."))
    } else {
        Ok(())
    }
}
