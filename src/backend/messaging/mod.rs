//! Messaging Module
//!
//! This module implements patient/provider messaging on top of the
//! database.
//!
//! # Architecture
//!
//! - **`conversations`** - Conversation directory: one thread per
//!   (patient, provider) pair and the participant check
//! - **`messages`** - Message log: append, read, edit, delete, mark read
//! - **`handlers`** - HTTP handlers for `/api/conversations` and
//!   `/api/messages`
//!
//! Posting a message also publishes it to the conversation's realtime
//! room, whichever surface (HTTP or socket) it came from.

pub mod conversations;
pub mod handlers;
pub mod messages;

pub use handlers::*;
