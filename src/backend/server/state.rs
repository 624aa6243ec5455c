/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct holds:
 * - the SQLite connection pool
 * - the JWT signing keys and password hasher
 * - the `RoomRegistry` used for real-time fan-out
 *
 * Every field is cheap to clone; clones share the same underlying pool,
 * keys and registry.
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow handlers to extract only the part
 * of the state they need, e.g. `State(pool): State<SqlitePool>`.
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::auth::passwords::PasswordHasher;
use crate::backend::auth::sessions::JwtKeys;
use crate::backend::realtime::RoomRegistry;

/// Application state shared across all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool
    pub pool: SqlitePool,
    /// Access-token keys
    pub jwt: JwtKeys,
    /// bcrypt work factor
    pub passwords: PasswordHasher,
    /// Live connections and conversation rooms
    pub rooms: RoomRegistry,
}

impl AppState {
    /// Create state with a fresh, empty room registry
    pub fn new(pool: SqlitePool, jwt: JwtKeys, passwords: PasswordHasher) -> Self {
        Self {
            pool,
            jwt,
            passwords,
            rooms: RoomRegistry::new(),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl FromRef<AppState> for PasswordHasher {
    fn from_ref(state: &AppState) -> Self {
        state.passwords
    }
}

impl FromRef<AppState> for RoomRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.rooms.clone()
    }
}
