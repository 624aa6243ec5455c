//! Health data points and health goals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded measurement (blood pressure, weight, steps, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthData {
    pub id: i64,
    pub user_id: i64,
    pub data_type: String,
    pub value: f64,
    pub unit: Option<String>,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/health-data`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateHealthDataRequest {
    pub data_type: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub notes: Option<String>,
    pub recorded_at: Option<String>,
}

/// Body of `PUT /api/health-data/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHealthDataRequest {
    pub data_type: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub notes: Option<String>,
    pub recorded_at: Option<String>,
}

/// Query string of `GET /api/health-data`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthDataQuery {
    pub data_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A target value for one data type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthGoal {
    pub id: i64,
    pub user_id: i64,
    pub data_type: String,
    pub target_value: f64,
    /// Latest recorded value of `data_type`, refreshed on listing
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub is_achieved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/health-goals`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateHealthGoalRequest {
    pub data_type: Option<String>,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub deadline: Option<String>,
}

/// Body of `PUT /api/health-goals/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHealthGoalRequest {
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub deadline: Option<String>,
}

/// Whether `current` satisfies `target`.
///
/// A positive target is a floor to reach. A zero or negative target is a
/// ceiling to stay under, expressed by its absolute value (e.g. `-120` for
/// "systolic at most 120").
pub fn is_goal_achieved(target: f64, current: f64) -> bool {
    if target > 0.0 {
        current >= target
    } else {
        current <= target.abs()
    }
}
