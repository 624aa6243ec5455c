//! WebSocket endpoint
//!
//! `GET /ws` authenticates the caller before upgrading. The token comes
//! from `?token=` (browsers cannot set headers on a WebSocket handshake)
//! or an `Authorization: Bearer` header. Without a valid token the request
//! is answered 401 and never upgraded.
//!
//! Each upgraded connection runs as two halves:
//!
//! - a writer task that drains the connection's event queue into the sink
//!   and keeps the socket alive with periodic pings
//! - the reader loop, which feeds text frames to the session dispatcher
//!
//! When the reader ends the connection is removed from every room.

use std::time::Duration;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::time::{interval, MissedTickBehavior};

use super::registry::EventReceiver;
use super::session;
use crate::backend::error::BackendError;
use crate::backend::middleware::{authenticate, bearer_token, ApiQuery, AuthenticatedUser};
use crate::backend::server::state::AppState;

/// Server-initiated ping period
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Query parameters of the upgrade request
#[derive(Debug, Default, Deserialize)]
pub struct WsAuthQuery {
    pub token: Option<String>,
}

/// GET /ws
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<WsAuthQuery>,
    headers: HeaderMap,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let user = match authenticate_upgrade(&state, query.token.as_deref(), &headers) {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!("WebSocket auth failed");
            return err.into_response();
        }
    };

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    tracing::info!(user_id = user.user_id, "WebSocket connection authenticated");
    ws.on_upgrade(move |socket| run_connection(socket, state, user.user_id))
}

fn authenticate_upgrade(
    state: &AppState,
    query_token: Option<&str>,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, BackendError> {
    let token = query_token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or_else(|| bearer_token(headers))
        .ok_or_else(|| BackendError::unauthenticated("Missing authorization token"))?;

    authenticate(&state.jwt, token)
}

/// Serve one authenticated connection until either side closes it.
pub async fn run_connection(socket: WebSocket, state: AppState, user_id: i64) {
    let (sink, mut stream) = socket.split();
    let (connection, events) = state.rooms.register(user_id);

    let mut writer = tokio::spawn(write_events(sink, events));

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    session::handle_text_frame(&state, connection, user_id, text.as_str()).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                // Pings are answered by axum; binary frames are not part of the protocol.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(connection = %connection, error = %e, "WebSocket read error");
                    break;
                }
            },
            _ = &mut writer => break,
        }
    }

    state.rooms.disconnect(connection);
    writer.abort();
    tracing::info!(connection = %connection, user_id, "WebSocket connection closed");
}

async fn write_events(
    mut sink: SplitSink<WebSocket, Message>,
    mut events: EventReceiver,
) {
    let mut ping = interval(PING_INTERVAL);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ping.tick().await;

    loop {
        let frame = tokio::select! {
            event = events.recv() => match event {
                Some(event) => match event.to_json() {
                    Ok(json) => Message::Text(json.into()),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to serialize server event");
                        continue;
                    }
                },
                None => break,
            },
            _ = ping.tick() => Message::Ping(Vec::new().into()),
        };

        if sink.send(frame).await.is_err() {
            break;
        }
    }

    let _ = sink.close().await;
}
