//! Client profile domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::FieldErrors;

/// Guest contact and identity data, optionally linked to one user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub lastname: String,
    pub document_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub email: Option<String>,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    /// Joined from the linked account
    pub user_username: Option<String>,
    pub user_email: Option<String>,
}

impl Client {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, update: UpdateClientRequest) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.lastname {
            self.lastname = v;
        }
        if let Some(v) = update.document_number {
            self.document_number = v;
        }
        if let Some(v) = update.street {
            self.street = v;
        }
        if let Some(v) = update.city {
            self.city = v;
        }
        if let Some(v) = update.state {
            self.state = v;
        }
        if let Some(v) = update.country {
            self.country = v;
        }
        if let Some(v) = update.email {
            self.email = normalize_email(Some(v));
        }
        if let Some(v) = update.phone {
            self.phone = v;
        }
    }
}

pub const EMAIL_TAKEN: &str = "A client with this email already exists.";
pub const DOCUMENT_TAKEN: &str = "A client with this document number already exists.";
pub const PROFILE_EXISTS: &str = "You already have a client profile.";

/// Field errors for uniqueness lookups done against storage.
pub fn uniqueness_errors(email_taken: bool, document_taken: bool) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if email_taken {
        errors.push("email", EMAIL_TAKEN);
    }
    if document_taken {
        errors.push("document_number", DOCUMENT_TAKEN);
    }
    errors
}

/// Adds uniqueness errors for fields that passed their field rules.
pub fn with_uniqueness(mut errors: FieldErrors, email_taken: bool, document_taken: bool) -> FieldErrors {
    for e in uniqueness_errors(email_taken, document_taken).into_vec() {
        if !errors.contains_field(&e.field) {
            errors.push(e.field, e.message);
        }
    }
    errors
}

/// Blank emails are stored as NULL so the unique index ignores them.
pub fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}

/// Request payload for creating a client profile.
///
/// Missing text fields default to empty and are reported as blank, so every
/// problem comes back keyed by field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateClientRequest {
    /// Account to link; only honoured for staff callers.
    #[serde(default)]
    pub user: Option<Uuid>,

    #[serde(default)]
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub lastname: String,

    #[serde(default)]
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 15, message = "Ensure this field has no more than 15 characters.")
    )]
    pub document_number: String,

    #[serde(default)]
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub street: String,

    #[serde(default)]
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub city: String,

    #[serde(default)]
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub state: String,

    #[serde(default)]
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub country: String,

    #[serde(default)]
    #[validate(
        custom(function = "crate::models::client::validate_optional_email"),
        length(max = 254, message = "Ensure this field has no more than 254 characters.")
    )]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: String,
}

impl CreateClientRequest {
    /// True for an empty `{}` payload.
    pub fn is_empty(&self) -> bool {
        self.user.is_none()
            && self.name.is_empty()
            && self.lastname.is_empty()
            && self.document_number.is_empty()
            && self.street.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.country.is_empty()
            && self.email.is_none()
            && self.phone.is_empty()
    }

    pub fn normalized_email(&self) -> Option<String> {
        normalize_email(self.email.clone())
    }
}

/// Blank is allowed; anything else must look like an address once trimmed,
/// matching what [`normalize_email`] stores.
pub fn validate_optional_email(email: &str) -> Result<(), validator::ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(());
    }
    shared::validation::validate_email_format(email)
}

/// Request payload for updating a client profile (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub lastname: Option<String>,

    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 15, message = "Ensure this field has no more than 15 characters.")
    )]
    pub document_number: Option<String>,

    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub street: Option<String>,

    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub city: Option<String>,

    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub state: Option<String>,

    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        length(max = 50, message = "Ensure this field has no more than 50 characters.")
    )]
    pub country: Option<String>,

    #[validate(
        custom(function = "crate::models::client::validate_optional_email"),
        length(max = 254, message = "Ensure this field has no more than 254 characters.")
    )]
    pub email: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,
}

/// A full replacement (`PUT`) is a partial update that sets every field.
impl From<CreateClientRequest> for UpdateClientRequest {
    fn from(req: CreateClientRequest) -> Self {
        Self {
            name: Some(req.name),
            lastname: Some(req.lastname),
            document_number: Some(req.document_number),
            street: Some(req.street),
            city: Some(req.city),
            state: Some(req.state),
            country: Some(req.country),
            email: Some(req.email.unwrap_or_default()),
            phone: Some(req.phone),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientResponse {
    pub id: i64,
    pub user: Option<Uuid>,
    pub name: String,
    pub lastname: String,
    pub document_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub email: Option<String>,
    pub phone: String,
    pub user_username: Option<String>,
    pub user_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(c: Client) -> Self {
        Self {
            id: c.id,
            user: c.user_id,
            name: c.name,
            lastname: c.lastname,
            document_number: c.document_number,
            street: c.street,
            city: c.city,
            state: c.state,
            country: c.country,
            email: c.email,
            phone: c.phone,
            user_username: c.user_username,
            user_email: c.user_email,
            created_at: c.created_at,
        }
    }
}
