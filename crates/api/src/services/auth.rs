//! Authentication service for login and token refresh.

use chrono::Utc;
use domain::models::user::TokensResponse;
use persistence::repositories::UserRepository;
use shared::jwt::{JwtConfig, JwtError, TokenPair};
use shared::password::{verify_password, PasswordError};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No active account found with the given credentials")]
    InvalidCredentials,

    #[error("Token is invalid or expired")]
    InvalidRefreshToken,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidRefreshToken => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::DatabaseError(e) => ApiError::from(e),
            AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
            AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
        }
    }
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository,
    jwt: &'a JwtConfig,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: PgPool, jwt: &'a JwtConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Exchanges username and password for a token pair.
    ///
    /// Unknown users, wrong passwords and inactive accounts all fail the
    /// same way.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokensResponse, AuthError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, password_hash)? || !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }

        self.users.update_last_login(user.id, Utc::now()).await?;

        let tokens = self.jwt.issue_token_pair(user.id)?;
        tracing::info!(user_id = %user.id, jti = %tokens.access_jti, "User logged in");
        Ok(tokens_response(tokens))
    }

    /// Exchanges a refresh token for a new pair, as long as the account is
    /// still active.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokensResponse, AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;
        let user_id: Uuid = claims.user_id().map_err(|_| AuthError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AuthError::InvalidRefreshToken)?;

        let tokens = self.jwt.issue_token_pair(user.id)?;
        tracing::debug!(user_id = %user.id, "Token pair refreshed");
        Ok(tokens_response(tokens))
    }
}

fn tokens_response(tokens: TokenPair) -> TokensResponse {
    TokensResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.expires_in,
    }
}
