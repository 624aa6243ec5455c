//! Middleware Module
//!
//! This module contains request-processing helpers shared by the HTTP
//! handlers.
//!
//! # Architecture
//!
//! - **`auth`** - `AuthUser` extractor and bearer-token helpers
//! - **`json`** - `ApiJson` / `ApiQuery` extractors that reject with the
//!   backend's JSON error body

pub mod auth;
pub mod json;

pub use auth::{authenticate, bearer_token, AuthUser, AuthenticatedUser};
pub use json::{ApiJson, ApiQuery};
