/**
 * Server Initialization
 *
 * This module builds the application from its configuration:
 *
 * 1. Open the SQLite pool and apply migrations
 * 2. Build the token keys and password hasher
 * 3. Create `AppState` with an empty room registry
 * 4. Assemble the router with its middleware layers
 *
 * Rooms are in-memory only; nothing about live connections survives a
 * restart, and clients rejoin after reconnecting.
 */

use axum::Router;

use crate::backend::auth::passwords::PasswordHasher;
use crate::backend::auth::sessions::JwtKeys;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{connect_database, AppConfig, DEV_JWT_SECRET};
use crate::backend::server::state::AppState;

/// Create the application state for a configuration
pub async fn create_state(config: &AppConfig) -> Result<AppState, sqlx::Error> {
    if config.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("JWT_SECRET is not set; using the development secret");
    }

    let pool = connect_database(config).await?;
    let jwt = JwtKeys::new(&config.jwt_secret, config.jwt_ttl_hours);
    let passwords = PasswordHasher::new(config.bcrypt_cost);

    Ok(AppState::new(pool, jwt, passwords))
}

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails if the database cannot be opened or migrated.
pub async fn create_app(config: &AppConfig) -> Result<Router<()>, sqlx::Error> {
    tracing::info!("Initializing CareBridge backend server");

    let state = create_state(config).await?;
    let app = create_router(state, &config.cors_origins);

    tracing::info!("Router configured");
    Ok(app)
}
