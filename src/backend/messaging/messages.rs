//! Message log
//!
//! Append, read, edit, delete and mark-read for messages. Every operation
//! resolves access through the conversation directory first, so a
//! non-participant never learns anything beyond "exists but not yours".
//!
//! Posting is the one write with side effects outside the database: after
//! the insert commits, the stored message is broadcast as `new_message` to
//! the conversation's room. Posts are serialized through the registry's
//! publish gate, so ids, timestamps, list order and delivery order agree.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::conversations;
use crate::backend::auth::users::{profile_columns, profile_from_row};
use crate::backend::error::BackendError;
use crate::backend::realtime::RoomRegistry;
use crate::shared::event::ServerEvent;
use crate::shared::messaging::message::non_blank;
use crate::shared::messaging::Message;

fn select_messages() -> String {
    format!(
        r#"
        SELECT m.id, m.conversation_id, m.user_id, m.content, m.is_read, m.created_at, {}
        FROM messages m
        JOIN users au ON au.id = m.user_id
        "#,
        profile_columns("au", "au"),
    )
}

fn message_from_row(row: &SqliteRow) -> Result<Message, sqlx::Error> {
    Ok(Message {
        id: row.try_get("id")?,
        conversation_id: row.try_get("conversation_id")?,
        user_id: row.try_get("user_id")?,
        user: profile_from_row(row, "au")?,
        content: row.try_get("content")?,
        is_read: row.try_get("is_read")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Load a message without any access check
pub async fn find(pool: &SqlitePool, message_id: i64) -> Result<Option<Message>, sqlx::Error> {
    let row = sqlx::query(&format!("{} WHERE m.id = ?", select_messages()))
        .bind(message_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(message_from_row).transpose()
}

async fn find_existing(pool: &SqlitePool, message_id: i64) -> Result<Message, BackendError> {
    find(pool, message_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Message not found"))
}

/// All messages of a conversation, oldest first
///
/// Ties on `created_at` are broken by id. Since posts are serialized and
/// timestamps never decrease within a conversation, this is the order the
/// messages were persisted and broadcast in.
pub async fn list(
    pool: &SqlitePool,
    conversation_id: i64,
    requester_id: i64,
) -> Result<Vec<Message>, BackendError> {
    conversations::get(pool, conversation_id, requester_id).await?;

    let rows = sqlx::query(&format!(
        "{} WHERE m.conversation_id = ? ORDER BY m.created_at ASC, m.id ASC",
        select_messages()
    ))
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(message_from_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
}

/// Append a message and fan it out to the conversation's room
///
/// The message insert and the conversation's `updated_at` bump commit
/// together. Broadcasting happens only after commit, so a subscriber never
/// sees a message that a later read would not return. The publish gate is
/// held from before the transaction until the event is queued.
///
/// # Errors
/// - `InvalidInput` if the conversation id or non-blank content is missing
/// - `NotFound` / `Forbidden` from the participant check
pub async fn post(
    pool: &SqlitePool,
    rooms: &RoomRegistry,
    conversation_id: Option<i64>,
    author_id: i64,
    content: Option<&str>,
) -> Result<Message, BackendError> {
    let (Some(conversation_id), Some(content)) = (conversation_id, non_blank(content)) else {
        return Err(BackendError::invalid_input(
            "conversation_id and content are required",
        ));
    };

    conversations::get(pool, conversation_id, author_id).await?;

    let _gate = rooms.publish_gate().await;
    let mut tx = pool.begin().await?;

    // Never stamp a message earlier than its predecessor, even if the
    // clock stepped back.
    let latest: Option<DateTime<Utc>> = sqlx::query_scalar(
        "SELECT created_at FROM messages WHERE conversation_id = ? ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .bind(conversation_id)
    .fetch_optional(&mut *tx)
    .await?;
    let now = latest.map_or_else(Utc::now, |latest| latest.max(Utc::now()));

    let message_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO messages (conversation_id, user_id, content, is_read, created_at)
        VALUES (?, ?, ?, 0, ?)
        RETURNING id
        "#,
    )
    .bind(conversation_id)
    .bind(author_id)
    .bind(content)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(conversation_id)
        .execute(&mut *tx)
        .await?;

    let row = sqlx::query(&format!("{} WHERE m.id = ?", select_messages()))
        .bind(message_id)
        .fetch_one(&mut *tx)
        .await?;
    let message = message_from_row(&row)?;

    tx.commit().await?;

    let delivered = rooms.broadcast(conversation_id, &ServerEvent::NewMessage(message.clone()));
    tracing::info!(
        message_id = message.id,
        conversation_id,
        author_id,
        delivered,
        "Message posted"
    );

    Ok(message)
}

/// Replace a message's content; author only
pub async fn edit(
    pool: &SqlitePool,
    message_id: i64,
    requester_id: i64,
    content: Option<&str>,
) -> Result<Message, BackendError> {
    let Some(content) = non_blank(content) else {
        return Err(BackendError::invalid_input("content is required"));
    };

    let message = find_existing(pool, message_id).await?;
    if message.user_id != requester_id {
        return Err(BackendError::forbidden("Unauthorized"));
    }

    sqlx::query("UPDATE messages SET content = ? WHERE id = ?")
        .bind(content)
        .bind(message_id)
        .execute(pool)
        .await?;

    Ok(Message {
        content: content.to_string(),
        ..message
    })
}

/// Remove a message; author only
pub async fn delete(pool: &SqlitePool, message_id: i64, requester_id: i64) -> Result<(), BackendError> {
    let message = find_existing(pool, message_id).await?;
    if message.user_id != requester_id {
        return Err(BackendError::forbidden("Unauthorized"));
    }

    sqlx::query("DELETE FROM messages WHERE id = ?")
        .bind(message_id)
        .execute(pool)
        .await?;

    tracing::debug!(message_id, conversation_id = message.conversation_id, "Message deleted");
    Ok(())
}

/// Flag a message as read
///
/// Either participant may do this. Marking an already read message is a
/// no-op that still succeeds.
pub async fn mark_read(
    pool: &SqlitePool,
    message_id: i64,
    requester_id: i64,
) -> Result<Message, BackendError> {
    let message = find_existing(pool, message_id).await?;
    conversations::get(pool, message.conversation_id, requester_id).await?;

    if !message.is_read {
        sqlx::query("UPDATE messages SET is_read = 1 WHERE id = ?")
            .bind(message_id)
            .execute(pool)
            .await?;
    }

    Ok(Message {
        is_read: true,
        ..message
    })
}
