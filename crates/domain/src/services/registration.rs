//! Registration rules for a new account and its embedded client profile.

use validator::Validate;

use crate::errors::FieldErrors;
use crate::models::client::{with_uniqueness, CreateClientRequest};
use crate::models::user::RegisterRequest;

pub const USERNAME_TAKEN: &str = "A user with this username already exists.";
pub const USER_EMAIL_TAKEN: &str = "A user with this email already exists.";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match.";
pub const PROFILE_KEY: &str = "client_profile";
pub const REGISTERED_MESSAGE: &str = "User created successfully";

/// Field rules plus the uniqueness lookups for the account.
///
/// The password confirmation is only compared when every field is valid.
pub fn check_account(
    req: &RegisterRequest,
    username_taken: bool,
    email_taken: bool,
) -> Result<(), FieldErrors> {
    let mut errors = match req.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };

    if username_taken && !errors.contains_field("username") {
        errors.push("username", USERNAME_TAKEN);
    }
    if email_taken && !errors.contains_field("email") {
        errors.push("email", USER_EMAIL_TAKEN);
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    if req.password != req.confirm_password {
        return Err(FieldErrors::non_field(PASSWORDS_DO_NOT_MATCH));
    }
    Ok(())
}

/// The profile to create for a new account: linked to it and sharing its
/// email.
pub fn profile_for_account(profile: &CreateClientRequest, account_email: &str) -> CreateClientRequest {
    CreateClientRequest {
        user: None,
        email: Some(account_email.to_string()),
        ..profile.clone()
    }
}

/// Field rules plus uniqueness for the embedded profile, keyed under
/// `client_profile.`.
pub fn check_profile(
    profile: &CreateClientRequest,
    email_taken: bool,
    document_taken: bool,
) -> Result<(), FieldErrors> {
    let errors = match profile.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };

    with_uniqueness(errors, email_taken, document_taken)
        .nested(PROFILE_KEY)
        .into_result()
}
