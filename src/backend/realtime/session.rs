//! Per-connection event dispatch
//!
//! Everything a connection can ask for over the socket, independent of the
//! socket itself. The socket task only decodes frames and calls in here,
//! which keeps the join/leave/send rules testable without a live
//! WebSocket.
//!
//! A failed event answers the sending connection with an `error` event and
//! leaves the connection open.

use crate::backend::error::BackendError;
use crate::backend::messaging::{conversations, messages};
use crate::backend::server::state::AppState;
use crate::shared::event::{ClientEvent, ServerEvent};

use super::registry::ConnectionId;

/// Handle one raw text frame from a connection
pub async fn handle_text_frame(state: &AppState, connection: ConnectionId, user_id: i64, text: &str) {
    match ClientEvent::from_json(text) {
        Ok(event) => handle_client_event(state, connection, user_id, event).await,
        Err(e) => {
            tracing::debug!(connection = %connection, error = %e, "Undecodable frame");
            state.rooms.send_to(connection, ServerEvent::error("Invalid event"));
        }
    }
}

/// Apply a decoded client event on behalf of `user_id`
pub async fn handle_client_event(
    state: &AppState,
    connection: ConnectionId,
    user_id: i64,
    event: ClientEvent,
) {
    let reply = match event {
        ClientEvent::JoinConversation { conversation_id } => {
            join(state, connection, user_id, conversation_id).await
        }
        ClientEvent::LeaveConversation { conversation_id } => leave(state, connection, conversation_id),
        ClientEvent::SendMessage {
            conversation_id,
            content,
        } => messages::post(
            &state.pool,
            &state.rooms,
            conversation_id,
            user_id,
            content.as_deref(),
        )
        .await
        .map(|_| None),
    };

    match reply {
        Ok(Some(event)) => {
            state.rooms.send_to(connection, event);
        }
        Ok(None) => {}
        Err(err) => {
            tracing::debug!(connection = %connection, user_id, error = %err, "Client event failed");
            state.rooms.send_to(connection, ServerEvent::error(err.message()));
        }
    }
}

async fn join(
    state: &AppState,
    connection: ConnectionId,
    user_id: i64,
    conversation_id: Option<i64>,
) -> Result<Option<ServerEvent>, BackendError> {
    let conversation_id = require_conversation_id(conversation_id)?;
    conversations::get(&state.pool, conversation_id, user_id).await?;

    state.rooms.join(connection, conversation_id);
    Ok(Some(ServerEvent::Joined { conversation_id }))
}

fn leave(
    state: &AppState,
    connection: ConnectionId,
    conversation_id: Option<i64>,
) -> Result<Option<ServerEvent>, BackendError> {
    let conversation_id = require_conversation_id(conversation_id)?;

    // Leaving a room the connection never joined is still acknowledged.
    state.rooms.leave(connection, conversation_id);
    Ok(Some(ServerEvent::Left { conversation_id }))
}

fn require_conversation_id(conversation_id: Option<i64>) -> Result<i64, BackendError> {
    conversation_id.ok_or_else(|| BackendError::invalid_input("conversation_id is required"))
}
