/**
 * Authentication Handler Types
 *
 * Request and response bodies of the account endpoints. Request fields
 * are optional on the wire so a missing field is reported as a
 * validation error with a specific message instead of a body rejection.
 */

use serde::{Deserialize, Serialize};

use crate::shared::user::UserProfile;

/// Register request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct RegisterRequest {
    pub email: Option<String>,
    /// Plaintext password (hashed before storage)
    pub password: Option<String>,
    pub name: Option<String>,
    /// Role name; defaults to `patient`
    pub role: Option<String>,
    /// Preferred language; defaults to `ja`
    pub language: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile update request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub language: Option<String>,
}

/// Auth response
///
/// Returned by register and login. Contains the access token and the
/// public profile for immediate use by the client.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserProfile,
}

/// Returns the trimmed value if present and non-empty.
pub(crate) fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
