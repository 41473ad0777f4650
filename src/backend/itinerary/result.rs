/**
 * Mutation Results
 *
 * Typed outcome of every itinerary mutation. Success carries the committed
 * change (with the final positions of each touched scope); failure carries
 * one of the kinds below. No failure ever leaves a partially renumbered
 * scope behind: the unit of work is dropped without commit.
 *
 * # Retrying
 *
 * `Conflict` and `LockTimeout` are expected under normal collaboration and
 * may be retried after refetching. `InvalidPosition` and `NotFound` point at
 * a client bug or a stale reference and are not retriable as-is.
 */

use thiserror::Error;

use crate::backend::lock::LockError;
use crate::backend::store::StoreError;
use crate::shared::error::SharedError;
use crate::shared::ordering::OrderingError;

pub type MutationResult<T> = Result<T, MutationError>;

#[derive(Debug, Error)]
pub enum MutationError {
    /// The caller's expected position is stale
    #[error("someone else just changed this, please refresh and retry ({detail})")]
    Conflict { detail: String },

    #[error("invalid position: {detail}")]
    InvalidPosition { detail: String },

    /// Missing, or not inside the scope the caller named
    #[error("{what} not found")]
    NotFound { what: String },

    #[error("the itinerary is busy, please retry ({detail})")]
    LockTimeout { detail: String },

    #[error(transparent)]
    Validation(#[from] SharedError),

    /// Stored positions of a scope are not `1..=count`
    #[error("stored order is inconsistent: {detail}")]
    Corrupted { detail: String },

    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),
}

impl MutationError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound {
            what: what.to_string(),
        }
    }

    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::LockTimeout { .. })
    }

    /// Stable machine-readable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Conflict { .. } => "conflict",
            Self::InvalidPosition { .. } => "invalid_position",
            Self::NotFound { .. } => "not_found",
            Self::LockTimeout { .. } => "lock_timeout",
            Self::Validation(_) => "validation",
            Self::Corrupted { .. } => "corrupted",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<OrderingError> for MutationError {
    fn from(err: OrderingError) -> Self {
        let detail = err.to_string();
        match err {
            OrderingError::Conflict { .. } => Self::Conflict { detail },
            OrderingError::InvalidPosition { .. } => Self::InvalidPosition { detail },
            OrderingError::NotInScope { item } => Self::NotFound { what: item },
            OrderingError::DuplicateItem { .. } | OrderingError::Corrupted { .. } => {
                Self::Corrupted { detail }
            }
        }
    }
}

impl From<LockError> for MutationError {
    fn from(err: LockError) -> Self {
        Self::LockTimeout {
            detail: err.to_string(),
        }
    }
}

impl From<StoreError> for MutationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::LockTimeout => Self::LockTimeout {
                detail: err.to_string(),
            },
            other => Self::Storage(other),
        }
    }
}
