/**
 * User Model and Database Operations
 *
 * This module handles user rows and their database operations. The
 * public projection (`UserProfile`) is built here as well, including the
 * column helpers other modules use when they join a profile into their
 * own queries.
 */

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::shared::user::{Role, UserProfile};

/// User row, including the password hash
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub name: Option<String>,
    /// Role, fixed at creation
    pub role: Role,
    /// Preferred language
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public projection without the password hash
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            language: self.language.clone(),
            created_at: self.created_at,
        }
    }
}

/// Values for a new account
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: Option<&'a str>,
    pub role: Role,
    pub language: &'a str,
}

const USER_COLUMNS: &str = "id, email, password_hash, name, role, language, created_at, updated_at";

fn decode_role(value: &str) -> Result<Role, sqlx::Error> {
    value
        .parse::<Role>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        name: row.try_get("name")?,
        role: decode_role(row.try_get::<&str, _>("role")?)?,
        language: row.try_get("language")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Select list for a user profile joined under `alias`, with every
/// column renamed to `<prefix>_<column>`.
pub(crate) fn profile_columns(alias: &str, prefix: &str) -> String {
    ["id", "email", "name", "role", "language", "created_at"]
        .iter()
        .map(|col| format!("{alias}.{col} AS {prefix}_{col}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read a profile selected with [`profile_columns`]
pub(crate) fn profile_from_row(row: &SqliteRow, prefix: &str) -> Result<UserProfile, sqlx::Error> {
    let col = |name: &str| format!("{prefix}_{name}");
    Ok(UserProfile {
        id: row.try_get(col("id").as_str())?,
        email: row.try_get(col("email").as_str())?,
        name: row.try_get(col("name").as_str())?,
        role: decode_role(row.try_get::<&str, _>(col("role").as_str())?)?,
        language: row.try_get(col("language").as_str())?,
        created_at: row.try_get(col("created_at").as_str())?,
    })
}

/// Create a new user
///
/// # Returns
/// Created user, or a database error (a duplicate email violates the
/// unique constraint)
pub async fn create_user(pool: &SqlitePool, new_user: NewUser<'_>) -> Result<User, sqlx::Error> {
    let now = Utc::now();

    let row = sqlx::query(&format!(
        r#"
        INSERT INTO users (email, password_hash, name, role, language, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(new_user.email)
    .bind(new_user.password_hash)
    .bind(new_user.name)
    .bind(new_user.role.as_str())
    .bind(new_user.language)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    user_from_row(&row)
}

/// Get user by email
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// List users, optionally restricted to one role, ordered by id
pub async fn list_users(pool: &SqlitePool, role: Option<Role>) -> Result<Vec<User>, sqlx::Error> {
    let rows = match role {
        Some(role) => {
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE role = ? ORDER BY id"))
                .bind(role.as_str())
                .fetch_all(pool)
                .await?
        }
        None => {
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(pool)
                .await?
        }
    };

    rows.iter().map(user_from_row).collect()
}

/// Update display name and/or preferred language
///
/// Fields passed as `None` are left unchanged.
///
/// # Returns
/// Updated user, or `None` if the user does not exist
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: i64,
    name: Option<&str>,
    language: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE users
        SET name = COALESCE(?, name), language = COALESCE(?, language), updated_at = ?
        WHERE id = ?
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(language)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(user_from_row).transpose()
}
