/**
 * Current User Handlers
 *
 * GET /api/auth/me returns the caller's profile; PUT
 * /api/auth/update-profile changes display name and preferred language.
 * Both require a valid access token.
 */

use axum::{extract::State, response::Json};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::{required, UpdateProfileRequest};
use crate::backend::auth::users::{get_user_by_id, update_profile as update_user_profile};
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::shared::user::UserProfile;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - missing or invalid token
/// * `404 Not Found` - the account behind the token no longer exists
pub async fn get_me(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
) -> Result<Json<UserProfile>, BackendError> {
    let user = get_user_by_id(&pool, auth.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    Ok(Json(user.profile()))
}

/// Update profile handler
///
/// Empty strings are treated as absent.
pub async fn update_profile(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, BackendError> {
    let user = update_user_profile(
        &pool,
        auth.user_id,
        required(&request.name),
        required(&request.language),
    )
    .await?
    .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!(user_id = user.id, "Profile updated");
    Ok(Json(user.profile()))
}
