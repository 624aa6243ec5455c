//! Message Data Structure
//!
//! A message posted into a conversation. The conversation a message belongs
//! to never changes; only its content (by the author) and its read flag
//! (by either participant) are mutable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::user::UserProfile;

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique message ID
    pub id: i64,
    pub conversation_id: i64,
    /// Author of the message
    pub user_id: i64,
    /// Public profile of the author
    pub user: UserProfile,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/messages`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub conversation_id: Option<i64>,
    pub content: Option<String>,
}

/// Body of `PUT /api/messages/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditMessageRequest {
    pub content: Option<String>,
}

/// Returns the content if it has at least one non-whitespace character.
pub fn non_blank(content: Option<&str>) -> Option<&str> {
    content.filter(|c| !c.trim().is_empty())
}
