//! Body and query extractors with JSON error responses.
//!
//! axum's stock `Json` and `Query` reject with plain-text bodies. These
//! wrappers route the rejection through `BackendError`, so a malformed body
//! answers `400 {"error": ...}` like every other client error.

use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::Json;

use crate::backend::error::BackendError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(BackendError))]
pub struct ApiJson<T>(pub T);

/// Query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(BackendError))]
pub struct ApiQuery<T>(pub T);
