//! Health HTTP Handlers
//!
//! `/api/health-data` and `/api/health-goals` act on the caller's own
//! records, plus the unauthenticated `GET /api/health` service health check.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use super::data::{self, HealthDataFilter};
use super::goals;
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, ApiQuery, AuthUser};
use crate::shared::health::{
    CreateHealthDataRequest, CreateHealthGoalRequest, HealthData, HealthDataQuery, HealthGoal,
    UpdateHealthDataRequest, UpdateHealthGoalRequest,
};
use crate::shared::time::parse_optional_timestamp;

/// GET /api/health
///
/// Always 200; a database failure is reported in the body.
pub async fn health_check(State(pool): State<SqlitePool>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => "healthy".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            format!("unhealthy: {e}")
        }
    };

    Json(json!({
        "status": "ok",
        "database": database,
        "service": "carebridge",
    }))
}

/// GET /api/health-data
pub async fn list_health_data(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    ApiQuery(query): ApiQuery<HealthDataQuery>,
) -> Result<Json<Vec<HealthData>>, BackendError> {
    let filter = HealthDataFilter {
        data_type: query.data_type.filter(|t| !t.trim().is_empty()),
        start: parse_optional_timestamp("start_date", query.start_date.as_deref())?,
        end: parse_optional_timestamp("end_date", query.end_date.as_deref())?,
    };
    Ok(Json(data::list(&pool, auth.user_id, &filter).await?))
}

/// POST /api/health-data
pub async fn create_health_data(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    ApiJson(payload): ApiJson<CreateHealthDataRequest>,
) -> Result<(StatusCode, Json<HealthData>), BackendError> {
    let data = data::create(&pool, auth.user_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(data)))
}

/// PUT /api/health-data/{id}
pub async fn update_health_data(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateHealthDataRequest>,
) -> Result<Json<HealthData>, BackendError> {
    Ok(Json(data::update(&pool, id, auth.user_id, &payload).await?))
}

/// DELETE /api/health-data/{id}
pub async fn delete_health_data(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, BackendError> {
    data::delete(&pool, id, auth.user_id).await?;
    Ok(Json(json!({ "message": "Health data deleted" })))
}

/// GET /api/health-goals
pub async fn list_health_goals(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
) -> Result<Json<Vec<HealthGoal>>, BackendError> {
    Ok(Json(goals::list(&pool, auth.user_id).await?))
}

/// POST /api/health-goals
pub async fn create_health_goal(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    ApiJson(payload): ApiJson<CreateHealthGoalRequest>,
) -> Result<(StatusCode, Json<HealthGoal>), BackendError> {
    let goal = goals::create(&pool, auth.user_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

/// PUT /api/health-goals/{id}
pub async fn update_health_goal(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<i64>,
    ApiJson(payload): ApiJson<UpdateHealthGoalRequest>,
) -> Result<Json<HealthGoal>, BackendError> {
    Ok(Json(goals::update(&pool, id, auth.user_id, &payload).await?))
}

/// DELETE /api/health-goals/{id}
pub async fn delete_health_goal(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, BackendError> {
    goals::delete(&pool, id, auth.user_id).await?;
    Ok(Json(json!({ "message": "Goal deleted" })))
}
