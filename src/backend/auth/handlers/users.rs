//! Users directory handlers: GET /api/users and GET /api/users/{id}.
//!
//! Patients use the directory to find providers to open a conversation
//! with, and providers to find their patients.

use axum::{
    extract::{Path, State},
    response::Json,
};
use sqlx::SqlitePool;

use crate::backend::auth::users::{get_user_by_id, list_users as list_user_rows};
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiQuery, AuthUser};
use crate::shared::user::{Role, UserListQuery, UserProfile};

/// List users, optionally filtered with `?role=`
///
/// The role filter accepts the same names and aliases as registration;
/// an unknown role is a 400.
pub async fn list_users(
    State(pool): State<SqlitePool>,
    AuthUser(_auth): AuthUser,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> Result<Json<Vec<UserProfile>>, BackendError> {
    let role = query
        .role
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .map(str::parse::<Role>)
        .transpose()?;

    let users = list_user_rows(&pool, role).await?;
    Ok(Json(users.iter().map(|u| u.profile()).collect()))
}

/// Get one user's public profile
pub async fn get_user(
    State(pool): State<SqlitePool>,
    AuthUser(_auth): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserProfile>, BackendError> {
    let user = get_user_by_id(&pool, user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    Ok(Json(user.profile()))
}
