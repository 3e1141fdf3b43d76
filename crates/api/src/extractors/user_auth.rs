//! Caller identity extractors.
//!
//! [`crate::middleware::require_user_auth`] resolves the bearer token to an
//! active account and stores a [`UserAuth`] in the request extensions; these
//! extractors read it back.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
pub use crate::middleware::user_auth::UserAuth;

pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserAuth>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized(NOT_AUTHENTICATED.to_string()))
    }
}

/// An authenticated staff account.
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserAuth);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = UserAuth::from_request_parts(parts, state).await?;
        if !auth.is_staff {
            return Err(ApiError::Forbidden(PERMISSION_DENIED.to_string()));
        }
        Ok(AdminUser(auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use uuid::Uuid;

    fn parts_with(auth: Option<UserAuth>) -> Parts {
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        if let Some(auth) = auth {
            parts.extensions.insert(auth);
        }
        parts
    }

    fn auth(is_staff: bool) -> UserAuth {
        UserAuth {
            user_id: Uuid::new_v4(),
            is_staff,
        }
    }

    #[tokio::test]
    async fn test_missing_auth_is_unauthorized() {
        let mut parts = parts_with(None);
        let result = UserAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_regular_user_is_not_admin() {
        let mut parts = parts_with(Some(auth(false)));
        assert!(UserAuth::from_request_parts(&mut parts, &()).await.is_ok());

        let result = AdminUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_staff_is_admin() {
        let mut parts = parts_with(Some(auth(true)));
        let AdminUser(admin) = AdminUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(admin.is_staff);
    }
}
