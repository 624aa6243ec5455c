//! Database test fixtures and utilities
//!
//! Every test gets its own in-memory SQLite database with the migrations
//! applied, so tests never share rows and can run in parallel.

use std::str::FromStr;

use carebridge::backend::auth::users::{create_user, NewUser, User};
use carebridge::backend::server::config::run_migrations;
use carebridge::shared::user::Role;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Placeholder stored for users created directly in the database
pub const UNUSABLE_PASSWORD_HASH: &str = "!";

/// Create a migrated in-memory database
///
/// The pool holds a single connection that is never recycled; an
/// in-memory SQLite database lives exactly as long as its connection.
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Invalid in-memory database URL")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to create test database pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run migrations on test database");
    pool
}

/// Insert a user directly, bypassing registration
pub async fn insert_user(pool: &SqlitePool, email: &str, role: Role) -> User {
    let name = email.split('@').next().unwrap_or(email);
    create_user(
        pool,
        NewUser {
            email,
            password_hash: UNUSABLE_PASSWORD_HASH,
            name: Some(name),
            role,
            language: "ja",
        },
    )
    .await
    .expect("Failed to insert test user")
}

/// Count the rows of a table
pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
