//! Reminders Module
//!
//! Medication, appointment and other reminders scheduled by a user for
//! themselves.
//!
//! - **`db`** - Database operations
//! - **`handlers`** - HTTP handlers for `/api/reminders`

pub mod db;
pub mod handlers;

pub use handlers::*;
