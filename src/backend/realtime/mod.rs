//! Real-time Update Module
//!
//! This module pushes conversation activity to connected clients over
//! WebSockets.
//!
//! # Architecture
//!
//! - **`registry`** - Live connections and conversation rooms
//! - **`session`** - Dispatch of client events (join, leave, send)
//! - **`socket`** - `GET /ws` upgrade and the per-connection tasks
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs       - Module exports and documentation
//! ├── registry.rs  - RoomRegistry
//! ├── session.rs   - Client event dispatch
//! └── socket.rs    - WebSocket endpoint
//! ```
//!
//! # Rooms
//!
//! Every conversation has a room keyed by its id. A connection joins a
//! room only after the participant check passes; from then on every
//! message committed to that conversation is pushed to it as
//! `new_message`, whether it was posted over HTTP or over the socket.
//! Rooms live in memory only and are gone after a restart.

pub mod registry;
pub mod session;
pub mod socket;

pub use registry::{ConnectionId, RoomRegistry};
pub use socket::ws_upgrade;
