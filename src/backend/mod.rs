//! Backend Module
//!
//! This module contains all server-side code for CareBridge. It provides an
//! Axum HTTP server backed by SQLite, a WebSocket endpoint for real-time
//! message delivery, and JWT authentication.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Accounts, password hashing, JWT tokens, users directory
//! - **`middleware`** - Authenticated-user extraction
//! - **`messaging`** - Conversation directory and message log
//! - **`realtime`** - Room registry and WebSocket sessions
//! - **`health`** - Health data points and health goals
//! - **`reminders`** - Scheduled reminders
//! - **`error`** - Backend error type and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Config, state, initialization
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication and users
//! ├── middleware/     - Request extractors
//! ├── messaging/      - Conversations and messages
//! ├── realtime/       - Rooms and sockets
//! ├── health/         - Health data and goals
//! ├── reminders/      - Reminders
//! └── error/          - Error types
//! ```
//!
//! # Write Path
//!
//! Every write that other users can observe goes through a single
//! transaction. Real-time fan-out happens only after the transaction has
//! committed, so a client never sees a `new_message` event for a message
//! that REST cannot return.
//!
//! # State Management
//!
//! `AppState` holds the SQLite pool, the JWT keys and the `RoomRegistry`.
//! All three are cheap to clone and shared across handlers.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Conversations and messages
pub mod messaging;

/// Real-time rooms and WebSocket sessions
pub mod realtime;

/// Health data and goals
pub mod health;

/// Reminders
pub mod reminders;


/// Re-export commonly used types
pub use error::BackendError;
pub use realtime::RoomRegistry;
pub use server::create_app;
