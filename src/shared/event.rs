/**
 * Real-time Event System
 *
 * This module defines the frames exchanged over the real-time socket.
 * Every frame is a JSON text frame of the form
 * `{"event": "<name>", "data": {...}}`.
 *
 * # Client to server
 *
 * - `join_conversation` - subscribe to a conversation's room
 * - `leave_conversation` - unsubscribe from a room
 * - `send_message` - post a message into a conversation
 *
 * # Server to client
 *
 * - `joined` / `left` - acknowledgements
 * - `new_message` - a message committed to a joined conversation
 * - `error` - a failed client event; the connection stays open
 */
use serde::{Deserialize, Serialize};

use crate::shared::messaging::Message;

/// Event sent by a connected client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinConversation {
        #[serde(default)]
        conversation_id: Option<i64>,
    },
    LeaveConversation {
        #[serde(default)]
        conversation_id: Option<i64>,
    },
    SendMessage {
        #[serde(default)]
        conversation_id: Option<i64>,
        #[serde(default)]
        content: Option<String>,
    },
}

impl ClientEvent {
    /// Parse a text frame
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Event pushed by the server to a connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Joined { conversation_id: i64 },
    Left { conversation_id: i64 },
    NewMessage(Message),
    Error { message: String },
}

impl ServerEvent {
    /// Create an error event
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Serialize to a text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
