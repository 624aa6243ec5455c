//! Shared Error Types
//!
//! Errors raised while interpreting values that arrive over the wire:
//! role names, timestamps and repeat rules. The backend answers every one
//! of them with `400 Bad Request` and the `Display` text as the message.
//!
//! # Usage
//!
//! ```rust
//! use carebridge::shared::error::SharedError;
//!
//! let error = SharedError::InvalidRole("nurse".to_string());
//! assert_eq!(error.message(), "Invalid role: nurse");
//! ```
use thiserror::Error;

/// A wire value that could not be interpreted
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// Role name outside the known set
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Timestamp in none of the accepted formats
    #[error("Invalid {field} format")]
    InvalidTimestamp {
        /// Request field that carried the value
        field: String,
    },

    /// Unknown reminder repeat rule
    #[error("Invalid repeat_type: {0}")]
    InvalidRepeatType(String),

    /// Any other field-level rule
    #[error("{message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a field validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending request field
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidRole(_) => "role",
            Self::InvalidTimestamp { field } => field,
            Self::InvalidRepeatType(_) => "repeat_type",
            Self::ValidationError { field, .. } => field,
        }
    }

    /// The message shown to API clients
    pub fn message(&self) -> String {
        self.to_string()
    }
}
