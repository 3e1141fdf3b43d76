//! User JWT authentication middleware.
//!
//! Validates the bearer access token and reloads the account on every
//! request, so deactivation or a staff flag change applies immediately.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use persistence::repositories::UserRepository;
use shared::jwt::JwtConfig;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::user_auth::NOT_AUTHENTICATED;
use crate::middleware::trace_id::get_request_id;

/// Authenticated caller, stored in request extensions.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: Uuid,
    pub is_staff: bool,
}

/// Returns the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Checks the signature, expiry and type of an access token.
///
/// Returns the subject.
pub fn verify_access_token(jwt: &JwtConfig, token: &str) -> Result<Uuid, ApiError> {
    let claims = jwt.validate_access_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Access token rejected");
        ApiError::Unauthorized("Given token not valid for any token type".to_string())
    })?;
    claims
        .user_id()
        .map_err(|_| ApiError::Unauthorized("Token contained no recognizable user identification".to_string()))
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<UserAuth, ApiError> {
    let token = bearer_token(headers)
        .ok_or_else(|| ApiError::Unauthorized(NOT_AUTHENTICATED.to_string()))?;
    let user_id = verify_access_token(&state.jwt, token)?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::Unauthorized("User not found or inactive".to_string()))?;

    Ok(UserAuth {
        user_id: user.id,
        is_staff: user.is_staff,
    })
}

/// Middleware that requires JWT user authentication.
///
/// Requests without a valid token for an active account get `401`.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&state, req.headers()).await {
        Ok(auth) => {
            tracing::Span::current().record("user_id", tracing::field::display(auth.user_id));
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(
                request_id = %get_request_id(req.extensions()),
                error = %e,
                "Authentication rejected"
            );
            e.into_response()
        }
    }
}
