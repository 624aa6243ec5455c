/**
 * Register Handler
 *
 * This module implements the account registration handler for
 * POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate email, password and role
 * 2. Check if the email is already registered
 * 3. Hash password using bcrypt
 * 4. Create user in database
 * 5. Generate access token
 * 6. Return token and profile with 201
 *
 * # Validation
 *
 * - Email and password are required
 * - Email must contain '@'
 * - Role must name a known role (aliases accepted); defaults to patient
 */

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{required, AuthResponse, RegisterRequest};
use crate::backend::auth::passwords::PasswordHasher;
use crate::backend::auth::sessions::JwtKeys;
use crate::backend::auth::users::{create_user, get_user_by_email, NewUser};
use crate::backend::error::BackendError;
use crate::backend::middleware::ApiJson;
use crate::shared::user::Role;

const DEFAULT_LANGUAGE: &str = "ja";

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - missing email/password, malformed email, unknown
///   role, or email already registered
/// * `500 Internal Server Error` - hashing, persistence or token failure
pub async fn register(
    State(pool): State<SqlitePool>,
    State(keys): State<JwtKeys>,
    State(passwords): State<PasswordHasher>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    let email = required(&request.email);
    let password = request.password.as_deref().filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(BackendError::invalid_input("Email and password are required"));
    };

    if !email.contains('@') {
        tracing::warn!(email = %email, "Invalid email format");
        return Err(BackendError::invalid_input("Invalid email format"));
    }

    let role = match required(&request.role) {
        Some(role) => role.parse::<Role>()?,
        None => Role::Patient,
    };
    let language = required(&request.language).unwrap_or(DEFAULT_LANGUAGE);

    if get_user_by_email(&pool, email).await?.is_some() {
        tracing::warn!(email = %email, "Email already registered");
        return Err(BackendError::invalid_input("User already exists"));
    }

    let password_hash = passwords.hash(password)?;

    let user = create_user(
        &pool,
        NewUser {
            email,
            password_hash: &password_hash,
            name: required(&request.name),
            role,
            language,
        },
    )
    .await
    .map_err(|e| {
        // Lost a race with a concurrent registration of the same email
        let duplicate = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if duplicate {
            BackendError::invalid_input("User already exists")
        } else {
            BackendError::from(e)
        }
    })?;

    let access_token = keys.create_token(user.id, &user.email)?;

    tracing::info!(user_id = user.id, role = %user.role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            user: user.profile(),
        }),
    ))
}
