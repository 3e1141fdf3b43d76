//! Account registration and the admin view of accounts.
//!
//! Registering writes the user and its optional client profile in one
//! transaction. When the profile is rejected the transaction is rolled back,
//! so no account is left behind.

use domain::models::client::CreateClientRequest;
use domain::models::user::{RegisterRequest, RegisterResponse, RegisteredUser, User, UserResponse};
use domain::services::registration::{
    check_account, check_profile, profile_for_account, REGISTERED_MESSAGE,
};
use persistence::repositories::{ClientRepository, NewUser, UserRepository};
use shared::password::hash_password;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::metrics::record_user_registered;
use crate::services::clients::new_client;

pub const USER_NOT_FOUND: &str = "User not found";

pub struct RegistrationService {
    pool: PgPool,
    users: UserRepository,
}

impl RegistrationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            pool,
        }
    }

    /// Creates an account and, when `client_profile` is given, its linked
    /// client profile.
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let mut tx = self.pool.begin().await?;

        let username_taken = UserRepository::username_exists(&mut tx, &req.username).await?;
        let email_taken = UserRepository::email_exists(&mut tx, &req.email).await?;
        check_account(&req, username_taken, email_taken)?;

        let password_hash = hash_password(&req.password)
            .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

        let user: User = UserRepository::insert(
            &mut tx,
            &NewUser {
                username: &req.username,
                email: &req.email,
                password_hash: &password_hash,
                first_name: &req.first_name,
                last_name: &req.last_name,
                is_staff: false,
            },
        )
        .await?
        .into();

        let with_profile = match req.client_profile() {
            Some(profile) => {
                let profile = profile_for_account(profile, &user.email);
                if let Err(e) = create_profile(&mut tx, &profile, user.id).await {
                    tx.rollback().await?;
                    info!(username = %req.username, "Registration rejected: invalid client profile");
                    return Err(e);
                }
                true
            }
            None => false,
        };

        tx.commit().await?;
        record_user_registered(with_profile);

        info!(
            user_id = %user.id,
            username = %user.username,
            with_profile,
            "User registered"
        );

        Ok(RegisterResponse {
            user: RegisteredUser::from(&user),
            message: REGISTERED_MESSAGE.to_string(),
        })
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, ApiError> {
        let users = self.users.list().await?;
        Ok(users
            .into_iter()
            .map(|u| UserResponse::from(User::from(u)))
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<UserResponse, ApiError> {
        let user: User = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?
            .into();
        Ok(user.into())
    }

    /// Deletes an account. Its client profile and reservations go with it.
    pub async fn delete(&self, id: Uuid, deleted_by: Uuid) -> Result<(), ApiError> {
        if !self.users.delete(id).await? {
            return Err(ApiError::NotFound(USER_NOT_FOUND.to_string()));
        }
        info!(user_id = %id, deleted_by = %deleted_by, "User deleted");
        Ok(())
    }
}

async fn create_profile(
    conn: &mut PgConnection,
    profile: &CreateClientRequest,
    user_id: Uuid,
) -> Result<(), ApiError> {
    let email = profile.normalized_email();
    let email_taken = match email.as_deref() {
        Some(email) => ClientRepository::email_taken(conn, email, None).await?,
        None => false,
    };
    let document_taken = !profile.document_number.is_empty()
        && ClientRepository::document_taken(conn, &profile.document_number, None).await?;

    check_profile(profile, email_taken, document_taken)?;

    ClientRepository::insert(conn, &new_client(profile, Some(user_id), email.as_deref())).await?;
    Ok(())
}
