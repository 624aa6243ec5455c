//! Reminder HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use super::db;
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, ApiQuery, AuthUser};
use crate::shared::reminder::{CreateReminderRequest, Reminder, ReminderQuery, UpdateReminderRequest};

/// GET /api/reminders?is_completed=&upcoming_only=
pub async fn list_reminders(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    ApiQuery(query): ApiQuery<ReminderQuery>,
) -> Result<Json<Vec<Reminder>>, BackendError> {
    Ok(Json(db::list(&pool, auth.user_id, &query).await?))
}

/// POST /api/reminders
pub async fn create_reminder(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    ApiJson(payload): ApiJson<CreateReminderRequest>,
) -> Result<(StatusCode, Json<Reminder>), BackendError> {
    let reminder = db::create(&pool, auth.user_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

/// PUT /api/reminders/{id}
pub async fn update_reminder(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateReminderRequest>,
) -> Result<Json<Reminder>, BackendError> {
    Ok(Json(db::update(&pool, id, auth.user_id, &payload).await?))
}

/// PUT /api/reminders/{id}/complete
pub async fn complete_reminder(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Reminder>, BackendError> {
    Ok(Json(db::complete(&pool, id, auth.user_id).await?))
}

/// DELETE /api/reminders/{id}
pub async fn delete_reminder(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, BackendError> {
    db::delete(&pool, id, auth.user_id).await?;
    Ok(Json(json!({ "message": "Reminder deleted" })))
}
