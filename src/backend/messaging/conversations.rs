//! Conversation directory
//!
//! Maps (patient, provider) pairs to conversations and decides who may see
//! a conversation. Every read of a conversation-scoped resource goes
//! through [`get`] so the participant check lives in one place.
//!
//! # Invariants
//!
//! - At most one conversation per (patient, provider) pair, enforced by a
//!   unique constraint; concurrent creates both end up with the same row.
//! - The patient has role `patient`, the provider `healthcare_provider`.
//! - Only the two participants may read a conversation.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::backend::auth::users::{get_user_by_id, profile_columns, profile_from_row};
use crate::backend::error::BackendError;
use crate::backend::realtime::RoomRegistry;
use crate::shared::messaging::Conversation;
use crate::shared::user::Role;

const UNREAD_COUNT_COLUMN: &str = r#"
    (
        SELECT COUNT(*) FROM messages m
        WHERE m.conversation_id = c.id AND m.user_id != ? AND m.is_read = 0
    ) AS unread_count
"#;

fn select_conversations() -> String {
    select_conversations_with("")
}

fn select_conversations_with(extra_columns: &str) -> String {
    format!(
        r#"
        SELECT c.id, c.patient_id, c.provider_id, c.created_at, c.updated_at, {}, {}{}
        FROM conversations c
        JOIN users pt ON pt.id = c.patient_id
        JOIN users pr ON pr.id = c.provider_id
        "#,
        profile_columns("pt", "pt"),
        profile_columns("pr", "pr"),
        extra_columns,
    )
}

fn conversation_from_row(row: &SqliteRow) -> Result<Conversation, sqlx::Error> {
    Ok(Conversation {
        id: row.try_get("id")?,
        patient_id: row.try_get("patient_id")?,
        provider_id: row.try_get("provider_id")?,
        patient: profile_from_row(row, "pt")?,
        provider: profile_from_row(row, "pr")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        unread_count: None,
    })
}

/// Load a conversation without any access check
pub async fn find(
    pool: &SqlitePool,
    conversation_id: i64,
) -> Result<Option<Conversation>, sqlx::Error> {
    let row = sqlx::query(&format!("{} WHERE c.id = ?", select_conversations()))
        .bind(conversation_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(conversation_from_row).transpose()
}

/// Every conversation `user_id` takes part in, most recently active first,
/// each annotated with the caller's unread count.
///
/// # Errors
/// `NotFound` if the user does not exist.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<Conversation>, BackendError> {
    if get_user_by_id(pool, user_id).await?.is_none() {
        return Err(BackendError::not_found("User not found"));
    }

    let sql = format!(
        r#"
        {}
        WHERE c.patient_id = ? OR c.provider_id = ?
        ORDER BY c.updated_at DESC, c.id DESC
        "#,
        select_conversations_with(&format!(", {UNREAD_COUNT_COLUMN}"))
    );

    let rows = sqlx::query(&sql)
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| {
            let mut conversation = conversation_from_row(row)?;
            conversation.unread_count = Some(row.try_get("unread_count")?);
            Ok(conversation)
        })
        .collect()
}

/// Messages in a conversation not authored by `user_id` and not yet read
pub async fn unread_count(
    pool: &SqlitePool,
    conversation_id: i64,
    user_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM messages WHERE conversation_id = ? AND user_id != ? AND is_read = 0",
    )
    .bind(conversation_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Create the conversation for a pair, or return the existing one
///
/// Validation happens before anything is written:
///
/// 1. both ids present, else `patient_id and provider_id are required`
/// 2. both users exist, else `Invalid user IDs`
/// 3. roles match, else `patient_id must be a patient` /
///    `provider_id must be a healthcare provider`
///
/// # Returns
/// The conversation and whether this call created it.
pub async fn create(
    pool: &SqlitePool,
    patient_id: Option<i64>,
    provider_id: Option<i64>,
) -> Result<(Conversation, bool), BackendError> {
    let (Some(patient_id), Some(provider_id)) = (patient_id, provider_id) else {
        return Err(BackendError::invalid_input("patient_id and provider_id are required"));
    };

    let patient = get_user_by_id(pool, patient_id).await?;
    let provider = get_user_by_id(pool, provider_id).await?;
    let (Some(patient), Some(provider)) = (patient, provider) else {
        return Err(BackendError::invalid_input("Invalid user IDs"));
    };

    match patient.role {
        Role::Patient => {}
        Role::HealthcareProvider | Role::Admin => {
            return Err(BackendError::invalid_input("patient_id must be a patient"));
        }
    }
    match provider.role {
        Role::HealthcareProvider => {}
        Role::Patient | Role::Admin => {
            return Err(BackendError::invalid_input(
                "provider_id must be a healthcare provider",
            ));
        }
    }

    let now = Utc::now();
    let inserted = sqlx::query(
        r#"
        INSERT INTO conversations (patient_id, provider_id, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (patient_id, provider_id) DO NOTHING
        "#,
    )
    .bind(patient_id)
    .bind(provider_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    let created = inserted.rows_affected() == 1;

    let row = sqlx::query(&format!(
        "{} WHERE c.patient_id = ? AND c.provider_id = ?",
        select_conversations()
    ))
    .bind(patient_id)
    .bind(provider_id)
    .fetch_one(pool)
    .await?;
    let conversation = conversation_from_row(&row)?;

    if created {
        tracing::info!(
            conversation_id = conversation.id,
            patient_id,
            provider_id,
            "Conversation created"
        );
    }
    Ok((conversation, created))
}

/// Load a conversation on behalf of `requester_id`
///
/// # Errors
/// `NotFound` (`Conversation not found`), then `Forbidden` (`Unauthorized`)
/// if the requester is not one of the two participants.
pub async fn get(
    pool: &SqlitePool,
    conversation_id: i64,
    requester_id: i64,
) -> Result<Conversation, BackendError> {
    let conversation = find(pool, conversation_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Conversation not found"))?;

    if !conversation.has_participant(requester_id) {
        tracing::warn!(conversation_id, requester_id, "Non-participant access to conversation");
        return Err(BackendError::forbidden("Unauthorized"));
    }
    Ok(conversation)
}

/// Delete a conversation and all of its messages
///
/// Both deletes run in one transaction. After commit the conversation's
/// room is closed so no further events are routed to it.
pub async fn delete(
    pool: &SqlitePool,
    rooms: &RoomRegistry,
    conversation_id: i64,
    requester_id: i64,
) -> Result<(), BackendError> {
    get(pool, conversation_id, requester_id).await?;

    let mut tx = pool.begin().await?;
    let messages = sqlx::query("DELETE FROM messages WHERE conversation_id = ?")
        .bind(conversation_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM conversations WHERE id = ?")
        .bind(conversation_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    let closed = rooms.close_room(conversation_id);
    tracing::info!(
        conversation_id,
        messages = messages.rows_affected(),
        connections = closed,
        "Conversation deleted"
    );
    Ok(())
}
