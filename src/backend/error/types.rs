/**
 * Backend Error Types
 *
 * Errors surfaced by HTTP handlers. Every variant maps to one status code
 * and one stable `kind` string so clients can branch without parsing the
 * message.
 *
 * # Status Mapping
 *
 * | Failure                         | Status |
 * |---------------------------------|--------|
 * | stale expected position         | 409    |
 * | position out of range           | 400    |
 * | id missing or in another scope  | 404    |
 * | scope lock not acquired in time | 503    |
 * | text validation                 | 400    |
 * | not an approved participant     | 403    |
 * | no caller identity              | 401    |
 * | corrupted order, storage        | 500    |
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::itinerary::MutationError;
use crate::shared::SharedError;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Request-level failure with an explicit status
    #[error("Handler error: {message}")]
    HandlerError { status: StatusCode, message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Mutation(err) => match err {
                MutationError::Conflict { .. } => StatusCode::CONFLICT,
                MutationError::InvalidPosition { .. } => StatusCode::BAD_REQUEST,
                MutationError::NotFound { .. } => StatusCode::NOT_FOUND,
                MutationError::LockTimeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
                MutationError::Validation(_) => StatusCode::BAD_REQUEST,
                MutationError::Corrupted { .. } | MutationError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::SharedError(SharedError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message shown to the client
    ///
    /// Internal failures are reported generically; their detail goes to the
    /// log instead.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } | Self::Forbidden { message } => message.clone(),
            Self::Mutation(MutationError::Storage(_) | MutationError::Corrupted { .. }) => {
                "internal error, please try again later".to_string()
            }
            Self::Mutation(err) => err.to_string(),
            Self::SharedError(err) => err.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::HandlerError { status, .. } if *status == StatusCode::UNAUTHORIZED => "unauthorized",
            Self::HandlerError { status, .. } if *status == StatusCode::CONFLICT => "already_member",
            Self::HandlerError { .. } => "bad_request",
            Self::Forbidden { .. } => "forbidden",
            Self::Mutation(err) => err.kind(),
            Self::SharedError(SharedError::ValidationError { .. }) => "validation",
        }
    }

    pub fn retriable(&self) -> bool {
        matches!(self, Self::Mutation(err) if err.is_retriable())
    }
}
