//! Health data points
//!
//! Owner-scoped CRUD over the `health_data` table. Rows are only ever
//! listed for their owner; a lookup by id answers 404 before 403 so the
//! order of checks matches the rest of the API.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::backend::error::BackendError;
use crate::shared::health::{CreateHealthDataRequest, HealthData, UpdateHealthDataRequest};
use crate::shared::time::parse_optional_timestamp;

const HEALTH_DATA_COLUMNS: &str =
    "id, user_id, data_type, value, unit, notes, recorded_at, created_at";

/// Filters of a health data listing
#[derive(Debug, Clone, Default)]
pub struct HealthDataFilter {
    pub data_type: Option<String>,
    /// Inclusive lower bound on `recorded_at`
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `recorded_at`
    pub end: Option<DateTime<Utc>>,
}

fn health_data_from_row(row: &SqliteRow) -> Result<HealthData, sqlx::Error> {
    Ok(HealthData {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        data_type: row.try_get("data_type")?,
        value: row.try_get("value")?,
        unit: row.try_get("unit")?,
        notes: row.try_get("notes")?,
        recorded_at: row.try_get("recorded_at")?,
        created_at: row.try_get("created_at")?,
    })
}

fn required_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The owner's data points, newest `recorded_at` first
pub async fn list(
    pool: &SqlitePool,
    user_id: i64,
    filter: &HealthDataFilter,
) -> Result<Vec<HealthData>, sqlx::Error> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {HEALTH_DATA_COLUMNS} FROM health_data WHERE user_id = "
    ));
    query.push_bind(user_id);

    if let Some(data_type) = &filter.data_type {
        query.push(" AND data_type = ").push_bind(data_type.clone());
    }
    if let Some(start) = filter.start {
        query.push(" AND recorded_at >= ").push_bind(start);
    }
    if let Some(end) = filter.end {
        query.push(" AND recorded_at <= ").push_bind(end);
    }
    query.push(" ORDER BY recorded_at DESC, id DESC");

    let rows = query.build().fetch_all(pool).await?;
    rows.iter().map(health_data_from_row).collect()
}

/// Record a data point for `user_id`
///
/// `recorded_at` defaults to now.
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    request: &CreateHealthDataRequest,
) -> Result<HealthData, BackendError> {
    let (Some(data_type), Some(value)) = (required_text(request.data_type.as_deref()), request.value)
    else {
        return Err(BackendError::invalid_input("data_type and value are required"));
    };
    let now = Utc::now();
    let recorded_at =
        parse_optional_timestamp("recorded_at", request.recorded_at.as_deref())?.unwrap_or(now);

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO health_data (user_id, data_type, value, unit, notes, recorded_at, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {HEALTH_DATA_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(data_type)
    .bind(value)
    .bind(&request.unit)
    .bind(&request.notes)
    .bind(recorded_at)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(health_data_from_row(&row)?)
}

/// Load a data point owned by `user_id`
pub async fn get_owned(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
) -> Result<HealthData, BackendError> {
    let row = sqlx::query(&format!(
        "SELECT {HEALTH_DATA_COLUMNS} FROM health_data WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| BackendError::not_found("Health data not found"))?;

    let data = health_data_from_row(&row)?;
    if data.user_id != user_id {
        return Err(BackendError::forbidden("Unauthorized"));
    }
    Ok(data)
}

/// Apply a partial update; absent fields keep their value
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    request: &UpdateHealthDataRequest,
) -> Result<HealthData, BackendError> {
    let mut data = get_owned(pool, id, user_id).await?;

    if let Some(data_type) = request.data_type.as_deref() {
        let Some(data_type) = required_text(Some(data_type)) else {
            return Err(BackendError::invalid_input("data_type must not be empty"));
        };
        data.data_type = data_type.to_string();
    }
    if let Some(value) = request.value {
        data.value = value;
    }
    if request.unit.is_some() {
        data.unit = request.unit.clone();
    }
    if request.notes.is_some() {
        data.notes = request.notes.clone();
    }
    if let Some(recorded_at) = parse_optional_timestamp("recorded_at", request.recorded_at.as_deref())? {
        data.recorded_at = recorded_at;
    }

    sqlx::query(
        r#"
        UPDATE health_data
        SET data_type = ?, value = ?, unit = ?, notes = ?, recorded_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&data.data_type)
    .bind(data.value)
    .bind(&data.unit)
    .bind(&data.notes)
    .bind(data.recorded_at)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(data)
}

/// Delete a data point owned by `user_id`
pub async fn delete(pool: &SqlitePool, id: i64, user_id: i64) -> Result<(), BackendError> {
    get_owned(pool, id, user_id).await?;

    sqlx::query("DELETE FROM health_data WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Most recently recorded value of one data type for a user
pub async fn latest_value(
    pool: &SqlitePool,
    user_id: i64,
    data_type: &str,
) -> Result<Option<f64>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT value FROM health_data
        WHERE user_id = ? AND data_type = ?
        ORDER BY recorded_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(data_type)
    .fetch_optional(pool)
    .await
}
