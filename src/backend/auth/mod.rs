//! Authentication Module
//!
//! This module handles accounts, password hashing, and access tokens, and
//! exposes the account and users-directory endpoints.
//!
//! # Architecture
//!
//! - **`users`** - User rows and database operations
//! - **`passwords`** - bcrypt hashing
//! - **`sessions`** - JWT token generation and validation
//! - **`handlers`** - HTTP handlers
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── passwords.rs    - Password hashing
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email + password (+ role) → user created → token returned
//! 2. **Login**: email + password → credentials verified → token returned
//! 3. **Authenticated requests**: `Authorization: Bearer <token>` → user id
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are HS256 JWTs; the default lifetime is 30 days
//! - Invalid credentials return 401 without saying which part was wrong

/// User data model and database operations
pub mod users;

/// Password hashing
pub mod passwords;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::{get_me, get_user, list_users, login, register, update_profile};
pub use handlers::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest};
pub use passwords::PasswordHasher;
pub use sessions::{Claims, JwtKeys};
