/**
 * Backend Error Types
 *
 * This module defines the error type returned by every handler and by the
 * directory/log operations underneath them.
 *
 * # Error Categories
 *
 * ## Client Errors
 *
 * - `InvalidInput` (400) - missing or malformed fields, wrong roles
 * - `Unauthenticated` (401) - missing/invalid token, bad credentials
 * - `Forbidden` (403) - caller is not a participant or not the owner
 * - `NotFound` (404) - unknown conversation, message, user, ...
 *
 * ## Server Errors
 *
 * - `Internal` (500) - token signing, password hashing, ...
 * - `Database` (500) - any `sqlx` failure
 * - `SerializationError` (500) - JSON encoding failures
 *
 * Server errors never leak their cause to the client. The response body
 * carries the stable message `Internal server error` and the cause is
 * logged.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Message returned to clients for every 5xx error
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use carebridge::backend::error::BackendError;
///
/// let err = BackendError::not_found("Conversation not found");
/// assert_eq!(err.status_code().as_u16(), 404);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request failed validation
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Human-readable error message
        message: String,
    },

    /// Caller could not be authenticated
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Human-readable error message
        message: String,
    },

    /// Caller is authenticated but may not touch the resource
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// Resource does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Unexpected server-side failure
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure (logged, not returned)
        message: String,
    },

    /// Persistence failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Shared error (validation of wire values)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new validation error (400)
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new authentication error (401)
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Create a new authorization error (403)
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a new not-found error (404)
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new internal error (500)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `InvalidInput` - 400 Bad Request
    /// - `Unauthenticated` - 401 Unauthorized
    /// - `Forbidden` - 403 Forbidden
    /// - `NotFound` - 404 Not Found
    /// - `SharedError` - 400 Bad Request
    /// - `Internal`, `Database`, `SerializationError` - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::Internal { .. } | Self::Database(_) | Self::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether this is a 5xx error
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Get the message shown to clients
    ///
    /// Server errors always yield [`INTERNAL_ERROR_MESSAGE`].
    pub fn message(&self) -> String {
        if self.is_server_error() {
            return INTERNAL_ERROR_MESSAGE.to_string();
        }
        match self {
            Self::InvalidInput { message }
            | Self::Unauthenticated { message }
            | Self::Forbidden { message }
            | Self::NotFound { message } => message.clone(),
            Self::SharedError(err) => err.message(),
            Self::Internal { .. } | Self::Database(_) | Self::SerializationError(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        }
    }
}

impl From<bcrypt::BcryptError> for BackendError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::internal(format!("password hashing failed: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for BackendError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::internal(format!("token signing failed: {}", err))
    }
}
