//! Database operations for reminders
//!
//! Reminders are stored and listed only. Nothing here fires them; clients
//! poll with `upcoming_only` and mark them complete.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::backend::error::BackendError;
use crate::shared::reminder::{
    validate_repeat_interval, CreateReminderRequest, Reminder, ReminderQuery, RepeatType,
    UpdateReminderRequest,
};
use crate::shared::time::{parse_optional_timestamp, parse_timestamp};

const REMINDER_COLUMNS: &str = "id, user_id, title, description, reminder_type, scheduled_at, \
     is_completed, repeat_type, repeat_interval, end_date, created_at";

fn reminder_from_row(row: &SqliteRow) -> Result<Reminder, sqlx::Error> {
    let repeat_type: String = row.try_get("repeat_type")?;
    Ok(Reminder {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        reminder_type: row.try_get("reminder_type")?,
        scheduled_at: row.try_get("scheduled_at")?,
        is_completed: row.try_get("is_completed")?,
        repeat_type: repeat_type
            .parse::<RepeatType>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        repeat_interval: row.try_get("repeat_interval")?,
        end_date: row.try_get("end_date")?,
        created_at: row.try_get("created_at")?,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The owner's reminders ordered by `scheduled_at`
pub async fn list(
    pool: &SqlitePool,
    user_id: i64,
    query: &ReminderQuery,
) -> Result<Vec<Reminder>, sqlx::Error> {
    let mut sql: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE user_id = "));
    sql.push_bind(user_id);

    if let Some(is_completed) = query.is_completed {
        sql.push(" AND is_completed = ").push_bind(is_completed);
    }
    if query.upcoming_only {
        sql.push(" AND scheduled_at >= ").push_bind(Utc::now());
    }
    sql.push(" ORDER BY scheduled_at ASC, id ASC");

    let rows = sql.build().fetch_all(pool).await?;
    rows.iter().map(reminder_from_row).collect()
}

/// Create a reminder for `user_id`
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    request: &CreateReminderRequest,
) -> Result<Reminder, BackendError> {
    let (Some(title), Some(scheduled_at)) = (
        non_empty(request.title.as_deref()),
        non_empty(request.scheduled_at.as_deref()),
    ) else {
        return Err(BackendError::invalid_input("title and scheduled_at are required"));
    };

    let scheduled_at = parse_timestamp("scheduled_at", scheduled_at)?;
    let repeat_type = non_empty(request.repeat_type.as_deref())
        .map(str::parse::<RepeatType>)
        .transpose()?
        .unwrap_or_default();
    let repeat_interval = validate_repeat_interval(request.repeat_interval.unwrap_or(1))?;
    let end_date = parse_optional_timestamp("end_date", non_empty(request.end_date.as_deref()))?;

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO reminders
            (user_id, title, description, reminder_type, scheduled_at, is_completed,
             repeat_type, repeat_interval, end_date, created_at)
        VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?, ?)
        RETURNING {REMINDER_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(title)
    .bind(&request.description)
    .bind(&request.reminder_type)
    .bind(scheduled_at)
    .bind(repeat_type.as_str())
    .bind(repeat_interval)
    .bind(end_date)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    let reminder = reminder_from_row(&row)?;
    tracing::debug!(reminder_id = reminder.id, user_id, "Reminder created");
    Ok(reminder)
}

/// Load a reminder owned by `user_id`
pub async fn get_owned(pool: &SqlitePool, id: i64, user_id: i64) -> Result<Reminder, BackendError> {
    let row = sqlx::query(&format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| BackendError::not_found("Reminder not found"))?;

    let reminder = reminder_from_row(&row)?;
    if reminder.user_id != user_id {
        return Err(BackendError::forbidden("Unauthorized"));
    }
    Ok(reminder)
}

/// Partial update; an empty `end_date` clears it
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    request: &UpdateReminderRequest,
) -> Result<Reminder, BackendError> {
    let mut reminder = get_owned(pool, id, user_id).await?;

    if let Some(title) = request.title.as_deref() {
        let Some(title) = non_empty(Some(title)) else {
            return Err(BackendError::invalid_input("title must not be empty"));
        };
        reminder.title = title.to_string();
    }
    if request.description.is_some() {
        reminder.description = request.description.clone();
    }
    if request.reminder_type.is_some() {
        reminder.reminder_type = request.reminder_type.clone();
    }
    if let Some(scheduled_at) = request.scheduled_at.as_deref() {
        reminder.scheduled_at = parse_timestamp("scheduled_at", scheduled_at)?;
    }
    if let Some(is_completed) = request.is_completed {
        reminder.is_completed = is_completed;
    }
    if let Some(repeat_type) = request.repeat_type.as_deref() {
        reminder.repeat_type = repeat_type.parse()?;
    }
    if let Some(repeat_interval) = request.repeat_interval {
        reminder.repeat_interval = validate_repeat_interval(repeat_interval)?;
    }
    if let Some(end_date) = request.end_date.as_deref() {
        reminder.end_date = parse_optional_timestamp("end_date", non_empty(Some(end_date)))?;
    }

    sqlx::query(
        r#"
        UPDATE reminders
        SET title = ?, description = ?, reminder_type = ?, scheduled_at = ?, is_completed = ?,
            repeat_type = ?, repeat_interval = ?, end_date = ?
        WHERE id = ?
        "#,
    )
    .bind(&reminder.title)
    .bind(&reminder.description)
    .bind(&reminder.reminder_type)
    .bind(reminder.scheduled_at)
    .bind(reminder.is_completed)
    .bind(reminder.repeat_type.as_str())
    .bind(reminder.repeat_interval)
    .bind(reminder.end_date)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(reminder)
}

/// Mark a reminder as completed
pub async fn complete(pool: &SqlitePool, id: i64, user_id: i64) -> Result<Reminder, BackendError> {
    let reminder = get_owned(pool, id, user_id).await?;

    sqlx::query("UPDATE reminders SET is_completed = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(Reminder {
        is_completed: true,
        ..reminder
    })
}

/// Delete a reminder owned by `user_id`
pub async fn delete(pool: &SqlitePool, id: i64, user_id: i64) -> Result<(), BackendError> {
    get_owned(pool, id, user_id).await?;

    sqlx::query("DELETE FROM reminders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
