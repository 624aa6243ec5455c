//! Server Module
//!
//! This module contains the server-side setup: configuration, shared
//! state, and application assembly.
//!
//! # Architecture
//!
//! - **`state`** - `AppState` and `FromRef` implementations
//! - **`config`** - Environment configuration and database connection
//! - **`init`** - Application creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Configuration loading and database pool
//! └── init.rs         - Application creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `AppConfig::from_env`
//! 2. **Database**: pool opened, migrations applied
//! 3. **State Creation**: keys, hasher and an empty room registry
//! 4. **Router Creation**: routes, CORS and tracing layers

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::{AppConfig, LogFormat};
pub use init::{create_app, create_state};
pub use state::AppState;
