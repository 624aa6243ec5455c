//! Messaging HTTP Handlers
//!
//! Thin wrappers that pull the caller out of the token and hand over to
//! the conversation directory and message log.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use super::{conversations, messages};
use crate::backend::error::BackendError;
use crate::backend::middleware::{ApiJson, AuthUser};
use crate::backend::realtime::RoomRegistry;
use crate::shared::messaging::{
    Conversation, CreateConversationRequest, EditMessageRequest, Message, SendMessageRequest,
};

/// GET /api/conversations
pub async fn list_conversations(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
) -> Result<Json<Vec<Conversation>>, BackendError> {
    let conversations = conversations::list_for_user(&pool, auth.user_id).await?;
    Ok(Json(conversations))
}

/// POST /api/conversations
///
/// 201 when the conversation was created, 200 when the pair already had
/// one.
pub async fn create_conversation(
    State(pool): State<SqlitePool>,
    AuthUser(_auth): AuthUser,
    ApiJson(payload): ApiJson<CreateConversationRequest>,
) -> Result<(StatusCode, Json<Conversation>), BackendError> {
    let (conversation, created) =
        conversations::create(&pool, payload.patient_id, payload.provider_id).await?;

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(conversation)))
}

/// GET /api/conversations/{id}
pub async fn get_conversation(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(conversation_id): Path<i64>,
) -> Result<Json<Conversation>, BackendError> {
    let conversation = conversations::get(&pool, conversation_id, auth.user_id).await?;
    Ok(Json(conversation))
}

/// DELETE /api/conversations/{id}
pub async fn delete_conversation(
    State(pool): State<SqlitePool>,
    State(rooms): State<RoomRegistry>,
    AuthUser(auth): AuthUser,
    Path(conversation_id): Path<i64>,
) -> Result<Json<Value>, BackendError> {
    conversations::delete(&pool, &rooms, conversation_id, auth.user_id).await?;
    Ok(Json(json!({ "message": "Conversation deleted" })))
}

/// GET /api/messages/conversation/{id}
pub async fn list_messages(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(conversation_id): Path<i64>,
) -> Result<Json<Vec<Message>>, BackendError> {
    let messages = messages::list(&pool, conversation_id, auth.user_id).await?;
    Ok(Json(messages))
}

/// POST /api/messages
pub async fn send_message(
    State(pool): State<SqlitePool>,
    State(rooms): State<RoomRegistry>,
    AuthUser(auth): AuthUser,
    ApiJson(payload): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), BackendError> {
    let message = messages::post(
        &pool,
        &rooms,
        payload.conversation_id,
        auth.user_id,
        payload.content.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// PUT /api/messages/{id}
pub async fn edit_message(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(message_id): Path<i64>,
    ApiJson(payload): ApiJson<EditMessageRequest>,
) -> Result<Json<Message>, BackendError> {
    let message =
        messages::edit(&pool, message_id, auth.user_id, payload.content.as_deref()).await?;
    Ok(Json(message))
}

/// DELETE /api/messages/{id}
pub async fn delete_message(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(message_id): Path<i64>,
) -> Result<Json<Value>, BackendError> {
    messages::delete(&pool, message_id, auth.user_id).await?;
    Ok(Json(json!({ "message": "Message deleted" })))
}

/// PUT /api/messages/{id}/read
pub async fn mark_message_read(
    State(pool): State<SqlitePool>,
    AuthUser(auth): AuthUser,
    Path(message_id): Path<i64>,
) -> Result<Json<Message>, BackendError> {
    let message = messages::mark_read(&pool, message_id, auth.user_id).await?;
    Ok(Json(message))
}
