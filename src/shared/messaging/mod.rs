//! Messaging Module
//!
//! This module contains the data structures for patient/provider messaging:
//!
//! - `Conversation` - A thread between one patient and one healthcare provider
//! - `Message` - A message posted into a conversation
//!
//! # Usage
//!
//! ```rust
//! use carebridge::shared::messaging::{Conversation, Message};
//! ```

pub mod conversation;
pub mod message;

// Re-export all types
pub use conversation::{Conversation, CreateConversationRequest};
pub use message::{EditMessageRequest, Message, SendMessageRequest};
