//! Shared Error Types
//!
//! Errors that can be raised without touching the server: malformed payloads
//! and input that breaks the itinerary's text rules.
//!
//! # Error Categories
//!
//! - `ValidationError` - a field failed validation
//!
//! # Usage
//!
//! ```rust
//! use tripboard::shared::error::SharedError;
//!
//! let error = SharedError::validation("title", "title cannot be empty");
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        field: String,
        message: String,
    },
}

impl SharedError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
