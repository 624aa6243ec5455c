//! Authentication Handlers Module
//!
//! This module contains the HTTP handlers for account and user-directory
//! endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - Account registration
//! ├── login.rs     - Credential login
//! ├── me.rs        - Current user profile (read and update)
//! └── users.rs     - Users directory
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`get_me`** - GET /api/auth/me
//! - **`update_profile`** - PUT /api/auth/update-profile
//! - **`list_users`** - GET /api/users
//! - **`get_user`** - GET /api/users/{id}

/// Request and response types
pub mod types;

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Current user handlers
pub mod me;

/// Users directory handlers
pub mod users;

// Re-export commonly used types
pub use types::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest};

// Re-export handlers
pub use login::login;
pub use me::{get_me, update_profile};
pub use register::register;
pub use users::{get_user, list_users};
