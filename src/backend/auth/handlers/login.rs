/**
 * Login Handler
 *
 * This module implements the authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Generate access token
 * 4. Return token and profile
 *
 * Unknown email and wrong password produce the same 401 response.
 */

use axum::{extract::State, response::Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{required, AuthResponse, LoginRequest};
use crate::backend::auth::passwords::PasswordHasher;
use crate::backend::auth::sessions::JwtKeys;
use crate::backend::auth::users::get_user_by_email;
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - missing email or password
/// * `401 Unauthorized` - invalid credentials
pub async fn login(
    State(pool): State<SqlitePool>,
    State(keys): State<JwtKeys>,
    State(passwords): State<PasswordHasher>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let email = required(&request.email);
    let password = request.password.as_deref().filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(BackendError::invalid_input("Email and password are required"));
    };

    let user = get_user_by_email(&pool, email).await?;

    let user = match user {
        Some(user) if passwords.verify(password, &user.password_hash) => user,
        _ => {
            tracing::warn!(email = %email, "Invalid login attempt");
            return Err(BackendError::unauthenticated("Invalid credentials"));
        }
    };

    let access_token = keys.create_token(user.id, &user.email)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        user: user.profile(),
    }))
}
