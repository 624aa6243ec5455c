//! Health Tracking Module
//!
//! Patients log measurements and set goals against them.
//!
//! - **`data`** - Health data points
//! - **`goals`** - Goals and progress tracking
//! - **`handlers`** - HTTP handlers, including the service health check

pub mod data;
pub mod goals;
pub mod handlers;

pub use handlers::*;
