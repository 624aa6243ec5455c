//! Reminder types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::error::SharedError;

/// How a reminder repeats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl RepeatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatType::None => "none",
            RepeatType::Daily => "daily",
            RepeatType::Weekly => "weekly",
            RepeatType::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RepeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(RepeatType::None),
            "daily" => Ok(RepeatType::Daily),
            "weekly" => Ok(RepeatType::Weekly),
            "monthly" => Ok(RepeatType::Monthly),
            _ => Err(SharedError::InvalidRepeatType(s.to_string())),
        }
    }
}

/// A scheduled reminder (medication, appointment, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub reminder_type: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub is_completed: bool,
    pub repeat_type: RepeatType,
    pub repeat_interval: i64,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/reminders`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateReminderRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub reminder_type: Option<String>,
    pub scheduled_at: Option<String>,
    pub repeat_type: Option<String>,
    pub repeat_interval: Option<i64>,
    pub end_date: Option<String>,
}

/// Body of `PUT /api/reminders/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReminderRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub reminder_type: Option<String>,
    pub scheduled_at: Option<String>,
    pub is_completed: Option<bool>,
    pub repeat_type: Option<String>,
    pub repeat_interval: Option<i64>,
    pub end_date: Option<String>,
}

/// Query string of `GET /api/reminders`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderQuery {
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub upcoming_only: bool,
}

/// Reject repeat intervals below one.
pub fn validate_repeat_interval(interval: i64) -> Result<i64, SharedError> {
    if interval < 1 {
        return Err(SharedError::validation(
            "repeat_interval",
            "repeat_interval must be at least 1",
        ));
    }
    Ok(interval)
}
