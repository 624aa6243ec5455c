//! CareBridge - Main Library
//!
//! CareBridge is a messaging and health-tracking backend that connects
//! patients with their healthcare providers.
//!
//! # Overview
//!
//! This library provides:
//! - Accounts with patient, healthcare provider and admin roles
//! - Patient/provider conversations with persistent message history
//! - Real-time message delivery over WebSocket rooms
//! - Health data logging, health goals and reminders
//!
//! # Module Structure
//!
//! The library is organized into two main modules:
//!
//! - **`shared`** - Wire types shared between server and clients
//!   - Users and roles, conversations and messages
//!   - Real-time socket events
//!   - Health data, goals and reminders
//!   - Validation errors
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server and WebSocket endpoint
//!   - Conversation directory and message log over SQLite
//!   - Room registry for real-time fan-out
//!   - JWT authentication
//!
//! # Usage
//!
//! ```rust,no_run
//! use carebridge::backend::server::config::AppConfig;
//! use carebridge::backend::server::init::create_app;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(&config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```

/// Shared types between server and clients
pub mod shared;

/// Backend server code
pub mod backend;
