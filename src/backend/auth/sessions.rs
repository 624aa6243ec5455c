/**
 * Session Management and JWT Tokens
 *
 * This module handles access-token generation and validation. Tokens are
 * HS256 JWTs whose subject is the user id; the rest of the backend trusts
 * the id once the signature and expiry have been checked.
 */

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Numeric user id carried in `sub`
    pub fn user_id(&self) -> Result<i64, BackendError> {
        self.sub
            .parse()
            .map_err(|_| BackendError::unauthenticated("Invalid token subject"))
    }
}

/// Signing keys and token lifetime
///
/// Built once from configuration and shared through the application state.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl JwtKeys {
    /// Create keys from an HMAC secret
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Create a token for a user
    ///
    /// # Arguments
    /// * `user_id` - User ID
    /// * `email` - User email
    pub fn create_token(&self, user_id: i64, email: &str) -> Result<String, BackendError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify and decode a token
    ///
    /// Any failure (bad signature, expired, malformed) maps to 401.
    pub fn verify_token(&self, token: &str) -> Result<Claims, BackendError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                BackendError::unauthenticated("Invalid or expired token")
            })
    }

    /// Verify a token and return the user id it was issued for
    pub fn user_id_from_token(&self, token: &str) -> Result<i64, BackendError> {
        self.verify_token(token)?.user_id()
    }
}
