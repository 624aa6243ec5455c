//! User and role types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::error::SharedError;

/// Role of an account
///
/// Roles are a closed set. Authorization checks match on them exhaustively,
/// so a new role forces every checkpoint to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    HealthcareProvider,
    Admin,
}

impl Role {
    /// Canonical storage and wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::HealthcareProvider => "healthcare_provider",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a role name.
///
/// Matching is case-insensitive and treats `-` like `_`. `provider` and
/// `healthcare` are accepted as aliases of `healthcare_provider`. Anything
/// else is rejected with `Invalid role: <input>`.
impl FromStr for Role {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "patient" => Ok(Role::Patient),
            "healthcare_provider" | "healthcare" | "provider" => Ok(Role::HealthcareProvider),
            "admin" => Ok(Role::Admin),
            _ => Err(SharedError::InvalidRole(s.to_string())),
        }
    }
}

/// Public projection of a user account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

/// Query string of `GET /api/users`
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<String>,
}
