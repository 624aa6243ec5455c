//! Health goals
//!
//! A goal tracks one data type against a target. `current_value` and
//! `is_achieved` are derived from the owner's latest data point and are
//! refreshed (and written back) whenever goals are listed.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::data::latest_value;
use crate::backend::error::BackendError;
use crate::shared::health::{
    is_goal_achieved, CreateHealthGoalRequest, HealthGoal, UpdateHealthGoalRequest,
};
use crate::shared::time::parse_optional_timestamp;

const HEALTH_GOAL_COLUMNS: &str = "id, user_id, data_type, target_value, current_value, unit, \
     deadline, is_achieved, created_at, updated_at";

fn goal_from_row(row: &SqliteRow) -> Result<HealthGoal, sqlx::Error> {
    Ok(HealthGoal {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        data_type: row.try_get("data_type")?,
        target_value: row.try_get("target_value")?,
        current_value: row.try_get("current_value")?,
        unit: row.try_get("unit")?,
        deadline: row.try_get("deadline")?,
        is_achieved: row.try_get("is_achieved")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// The owner's goals with progress refreshed from their latest data
///
/// Goals whose data type has no recorded value yet are returned as stored.
pub async fn list(pool: &SqlitePool, user_id: i64) -> Result<Vec<HealthGoal>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "SELECT {HEALTH_GOAL_COLUMNS} FROM health_goals WHERE user_id = ? ORDER BY id ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut goals = rows.iter().map(goal_from_row).collect::<Result<Vec<_>, _>>()?;
    for goal in &mut goals {
        refresh_progress(pool, goal).await?;
    }
    Ok(goals)
}

async fn refresh_progress(pool: &SqlitePool, goal: &mut HealthGoal) -> Result<(), sqlx::Error> {
    let Some(current) = latest_value(pool, goal.user_id, &goal.data_type).await? else {
        return Ok(());
    };
    let achieved = is_goal_achieved(goal.target_value, current);
    if goal.current_value == Some(current) && goal.is_achieved == achieved {
        return Ok(());
    }

    goal.current_value = Some(current);
    goal.is_achieved = achieved;
    sqlx::query("UPDATE health_goals SET current_value = ?, is_achieved = ? WHERE id = ?")
        .bind(current)
        .bind(achieved)
        .bind(goal.id)
        .execute(pool)
        .await?;

    tracing::debug!(goal_id = goal.id, current, achieved, "Refreshed goal progress");
    Ok(())
}

/// Create a goal for `user_id`
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    request: &CreateHealthGoalRequest,
) -> Result<HealthGoal, BackendError> {
    let data_type = request
        .data_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let (Some(data_type), Some(target_value)) = (data_type, request.target_value) else {
        return Err(BackendError::invalid_input(
            "data_type and target_value are required",
        ));
    };
    let deadline = parse_optional_timestamp("deadline", request.deadline.as_deref())?;
    let now = Utc::now();

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO health_goals
            (user_id, data_type, target_value, unit, deadline, is_achieved, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 0, ?, ?)
        RETURNING {HEALTH_GOAL_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(data_type)
    .bind(target_value)
    .bind(&request.unit)
    .bind(deadline)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(goal_from_row(&row)?)
}

/// Load a goal owned by `user_id`
pub async fn get_owned(pool: &SqlitePool, id: i64, user_id: i64) -> Result<HealthGoal, BackendError> {
    let row = sqlx::query(&format!(
        "SELECT {HEALTH_GOAL_COLUMNS} FROM health_goals WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| BackendError::not_found("Goal not found"))?;

    let goal = goal_from_row(&row)?;
    if goal.user_id != user_id {
        return Err(BackendError::forbidden("Unauthorized"));
    }
    Ok(goal)
}

/// Partial update of target, unit and deadline
///
/// An empty `deadline` string clears the deadline.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    request: &UpdateHealthGoalRequest,
) -> Result<HealthGoal, BackendError> {
    let mut goal = get_owned(pool, id, user_id).await?;

    if let Some(target_value) = request.target_value {
        goal.target_value = target_value;
        if let Some(current) = goal.current_value {
            goal.is_achieved = is_goal_achieved(target_value, current);
        }
    }
    if request.unit.is_some() {
        goal.unit = request.unit.clone();
    }
    if let Some(deadline) = request.deadline.as_deref() {
        goal.deadline = if deadline.trim().is_empty() {
            None
        } else {
            parse_optional_timestamp("deadline", Some(deadline))?
        };
    }
    goal.updated_at = Utc::now();

    sqlx::query(
        r#"
        UPDATE health_goals
        SET target_value = ?, unit = ?, deadline = ?, is_achieved = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(goal.target_value)
    .bind(&goal.unit)
    .bind(goal.deadline)
    .bind(goal.is_achieved)
    .bind(goal.updated_at)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(goal)
}

/// Delete a goal owned by `user_id`
pub async fn delete(pool: &SqlitePool, id: i64, user_id: i64) -> Result<(), BackendError> {
    get_owned(pool, id, user_id).await?;

    sqlx::query("DELETE FROM health_goals WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
