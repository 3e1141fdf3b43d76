//! Admin bootstrap service for initial setup.
//!
//! Creates the first staff account on startup when one is configured and no
//! account with that username exists yet.

use persistence::repositories::{NewUser, UserRepository};
use shared::password::{hash_password, PasswordError};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::AdminConfig;

/// Error types for admin bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// What [`bootstrap_admin`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    NotConfigured,
    AlreadyExists,
    Created,
}

/// Bootstrap the staff account if configured and not already present.
///
/// Call after migrations. Running it again is a no-op.
pub async fn bootstrap_admin(
    pool: &PgPool,
    config: &AdminConfig,
) -> Result<BootstrapOutcome, BootstrapError> {
    if !config.is_configured() {
        return Ok(BootstrapOutcome::NotConfigured);
    }
    if config.bootstrap_email.is_empty() {
        return Err(BootstrapError::Config(
            "admin.bootstrap_email must be set with admin.bootstrap_username".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    if UserRepository::username_exists(&mut tx, &config.bootstrap_username).await? {
        info!(
            username = %config.bootstrap_username,
            "Admin user already exists - skipping bootstrap"
        );
        return Ok(BootstrapOutcome::AlreadyExists);
    }

    let password_hash = hash_password(&config.bootstrap_password)?;

    let user = UserRepository::insert(
        &mut tx,
        &NewUser {
            username: &config.bootstrap_username,
            email: &config.bootstrap_email,
            password_hash: &password_hash,
            first_name: "",
            last_name: "",
            is_staff: true,
        },
    )
    .await?;

    tx.commit().await?;

    info!(
        username = %user.username,
        user_id = %user.id,
        "Bootstrap admin user created successfully"
    );
    warn!(
        "SECURITY: Remove HR__ADMIN__BOOTSTRAP_PASSWORD from configuration after initial setup"
    );

    Ok(BootstrapOutcome::Created)
}
