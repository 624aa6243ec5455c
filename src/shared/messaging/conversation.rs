//! Conversation Data Structure
//!
//! Represents a conversation between a patient and a healthcare provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::user::UserProfile;

/// A conversation between one patient and one healthcare provider
///
/// There is at most one conversation per (patient, provider) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: i64,
    pub patient_id: i64,
    pub provider_id: i64,
    /// Public profile of the patient
    pub patient: UserProfile,
    /// Public profile of the provider
    pub provider: UserProfile,
    pub created_at: DateTime<Utc>,
    /// Bumped every time a message is posted
    pub updated_at: DateTime<Utc>,
    /// Messages from the other participant the caller has not read yet.
    /// Only present in list views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<i64>,
}

impl Conversation {
    /// Check if user is one of the two participants
    pub fn has_participant(&self, user_id: i64) -> bool {
        self.patient_id == user_id || self.provider_id == user_id
    }
}

/// Body of `POST /api/conversations`
///
/// Both ids are optional on the wire so a missing id surfaces as a
/// validation error rather than a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateConversationRequest {
    pub patient_id: Option<i64>,
    pub provider_id: Option<i64>,
}
