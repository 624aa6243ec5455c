//! Shared Module
//!
//! This module contains the wire types shared between the backend and its
//! clients. Every type here is plain data: it serializes to the JSON bodies
//! of the REST API and to the frames of the real-time socket.
//!
//! # Overview
//!
//! - **`user`** - Roles and the public user profile
//! - **`messaging`** - Conversations, messages, and their request bodies
//! - **`event`** - Real-time socket events (client and server direction)
//! - **`health`** - Health data points and health goals
//! - **`reminder`** - Scheduled reminders and repeat rules
//! - **`time`** - Timestamp parsing for request fields
//! - **`error`** - Validation errors raised while interpreting wire values

/// Shared error types
pub mod error;

/// Users and roles
pub mod user;

/// Conversation and message types
pub mod messaging;

/// Real-time event system
pub mod event;

/// Health data and goals
pub mod health;

/// Reminders
pub mod reminder;

/// Timestamp parsing helpers
pub mod time;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use event::{ClientEvent, ServerEvent};
pub use messaging::{Conversation, Message};
pub use user::{Role, UserProfile};
