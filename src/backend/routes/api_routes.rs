/**
 * API Route Handlers
 *
 * This module wires the `/api` endpoints to their handlers.
 *
 * # Authentication
 *
 * Every route requires `Authorization: Bearer <token>` except:
 * - `POST /api/auth/register`
 * - `POST /api/auth/login`
 * - `GET /api/health`
 *
 * The check lives in the `AuthUser` extractor of each handler, so a route
 * is protected exactly when its handler asks for the caller.
 */

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::backend::auth::{get_me, get_user, list_users, login, register, update_profile};
use crate::backend::health::{
    create_health_data, create_health_goal, delete_health_data, delete_health_goal, health_check,
    list_health_data, list_health_goals, update_health_data, update_health_goal,
};
use crate::backend::messaging::{
    create_conversation, delete_conversation, delete_message, edit_message, get_conversation,
    list_conversations, list_messages, mark_message_read, send_message,
};
use crate::backend::reminders::{
    complete_reminder, create_reminder, delete_reminder, list_reminders, update_reminder,
};
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// ## Accounts
/// - `POST /api/auth/register`, `POST /api/auth/login`
/// - `GET /api/auth/me`, `PUT /api/auth/update-profile`
/// - `GET /api/users`, `GET /api/users/{id}`
///
/// ## Messaging
/// - `GET|POST /api/conversations`
/// - `GET|DELETE /api/conversations/{id}`
/// - `GET /api/messages/conversation/{id}`
/// - `POST /api/messages`
/// - `PUT|DELETE /api/messages/{id}`, `PUT /api/messages/{id}/read`
///
/// ## Health
/// - `GET|POST /api/health-data`, `PUT|DELETE /api/health-data/{id}`
/// - `GET|POST /api/health-goals`, `PUT|DELETE /api/health-goals/{id}`
/// - `GET|POST /api/reminders`, `PUT|DELETE /api/reminders/{id}`,
///   `PUT /api/reminders/{id}/complete`
/// - `GET /api/health`
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Accounts
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(get_me))
        .route("/api/auth/update-profile", put(update_profile))
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", get(get_user))
        // Conversations
        .route(
            "/api/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route(
            "/api/conversations/{id}",
            get(get_conversation).delete(delete_conversation),
        )
        // Messages
        .route("/api/messages", post(send_message))
        .route("/api/messages/conversation/{id}", get(list_messages))
        .route(
            "/api/messages/{id}",
            put(edit_message).delete(delete_message),
        )
        .route("/api/messages/{id}/read", put(mark_message_read))
        // Health tracking
        .route(
            "/api/health-data",
            get(list_health_data).post(create_health_data),
        )
        .route(
            "/api/health-data/{id}",
            put(update_health_data).delete(delete_health_data),
        )
        .route(
            "/api/health-goals",
            get(list_health_goals).post(create_health_goal),
        )
        .route(
            "/api/health-goals/{id}",
            put(update_health_goal).delete(delete_health_goal),
        )
        // Reminders
        .route("/api/reminders", get(list_reminders).post(create_reminder))
        .route(
            "/api/reminders/{id}",
            put(update_reminder).delete(delete_reminder),
        )
        .route("/api/reminders/{id}/complete", put(complete_reminder))
        // Service health
        .route("/api/health", get(health_check))
}
