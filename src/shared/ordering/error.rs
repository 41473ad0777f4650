use thiserror::Error;

use super::Position;

/// Reasons a reorder operation refuses to run
///
/// None of these are ever corrected silently. A failed operation leaves the
/// list exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    /// The caller's expected position is stale
    #[error("{item} is no longer at position {expected} (currently {actual})")]
    Conflict {
        item: String,
        expected: Position,
        actual: Position,
    },

    /// Requested position lies outside the allowed range
    #[error("position {position} is outside {min}..={max}")]
    InvalidPosition {
        position: Position,
        min: Position,
        max: Position,
    },

    /// The item is not a member of the scope it was addressed through
    #[error("{item} is not a member of this scope")]
    NotInScope { item: String },

    /// The item is already a member of the scope
    #[error("{item} is already a member of this scope")]
    DuplicateItem { item: String },

    /// Stored positions do not form `1..=count`
    #[error("scope {scope} is not densely ordered: {detail}")]
    Corrupted { scope: String, detail: String },
}

impl OrderingError {
    pub(crate) fn invalid_position(position: Position, max: Position) -> Self {
        Self::InvalidPosition {
            position,
            min: 1,
            max,
        }
    }
}
