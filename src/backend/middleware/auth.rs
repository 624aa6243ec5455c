/**
 * Authentication Extractor
 *
 * This module provides the `AuthUser` extractor for routes that require
 * an authenticated caller. It reads the bearer token from the
 * `Authorization` header, verifies it, and hands the user id to the
 * handler. A missing or invalid token rejects the request with 401.
 */

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::backend::auth::sessions::JwtKeys;
use crate::backend::error::BackendError;

/// Authenticated user data extracted from the token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify a raw token and build the authenticated user
pub fn authenticate(keys: &JwtKeys, token: &str) -> Result<AuthenticatedUser, BackendError> {
    let claims = keys.verify_token(token)?;
    Ok(AuthenticatedUser {
        user_id: claims.user_id()?,
        email: claims.email,
    })
}

/// Axum extractor for the authenticated user
///
/// ```rust,ignore
/// async fn handler(AuthUser(user): AuthUser) -> String {
///     format!("hello {}", user.user_id)
/// }
/// ```
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            tracing::debug!("Missing or malformed Authorization header");
            BackendError::unauthenticated("Missing authorization token")
        })?;

        let keys = JwtKeys::from_ref(state);
        let user = authenticate(&keys, token).map_err(|e| {
            tracing::warn!("Rejected access token");
            e
        })?;

        Ok(AuthUser(user))
    }
}
