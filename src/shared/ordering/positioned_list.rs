/**
 * Positioned List
 *
 * In-memory image of one scope's members, kept in position order. The
 * position of a member is its index in `members` plus one, so an instance
 * can never hold a gap or a duplicate position once it has been built.
 *
 * # Loading
 *
 * Stored rows are untrusted. `from_positions` sorts them and checks that the
 * positions are exactly `1..=count` with no key repeated. Anything else is
 * reported as `OrderingError::Corrupted` and is never repaired here.
 */

use std::fmt;

use super::error::OrderingError;
use super::{OrderedEntry, Position};

/// The members of one scope, ordered by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedList<S, K> {
    scope: S,
    pub(super) members: Vec<K>,
}

impl<S, K> PositionedList<S, K>
where
    S: fmt::Display,
    K: Clone + PartialEq + fmt::Display,
{
    /// An empty scope
    pub fn new(scope: S) -> Self {
        Self {
            scope,
            members: Vec::new(),
        }
    }

    /// Build the image of a scope from stored `(item, position)` rows
    ///
    /// Rows may arrive in any order.
    ///
    /// # Errors
    ///
    /// `Corrupted` when the positions are not exactly `1..=count` or an item
    /// appears twice.
    pub fn from_positions<I>(scope: S, rows: I) -> Result<Self, OrderingError>
    where
        I: IntoIterator<Item = (K, Position)>,
    {
        let mut rows: Vec<(K, Position)> = rows.into_iter().collect();
        rows.sort_by_key(|(_, position)| *position);

        for (index, (key, position)) in rows.iter().enumerate() {
            let expected = position_at(index);
            if *position != expected {
                return Err(OrderingError::Corrupted {
                    scope: scope.to_string(),
                    detail: format!("{key} holds position {position}, expected {expected}"),
                });
            }
            if rows[..index].iter().any(|(other, _)| other == key) {
                return Err(OrderingError::Corrupted {
                    scope: scope.to_string(),
                    detail: format!("{key} appears more than once"),
                });
            }
        }

        Ok(Self {
            scope,
            members: rows.into_iter().map(|(key, _)| key).collect(),
        })
    }

    pub fn scope(&self) -> &S {
        &self.scope
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of members as a position value
    pub fn count(&self) -> Position {
        position_at(self.members.len()) - 1
    }

    /// Position an appended member would receive
    pub fn next_position(&self) -> Position {
        position_at(self.members.len())
    }

    pub fn position_of(&self, item: &K) -> Option<Position> {
        self.members
            .iter()
            .position(|member| member == item)
            .map(position_at)
    }

    pub fn contains(&self, item: &K) -> bool {
        self.members.contains(item)
    }

    /// Members in position order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.members.iter()
    }

    /// Canonical `(item, position)` pairs in position order
    pub fn entries(&self) -> Vec<OrderedEntry<K>> {
        self.members
            .iter()
            .enumerate()
            .map(|(index, id)| OrderedEntry {
                id: id.clone(),
                position: position_at(index),
            })
            .collect()
    }
}

/// Position of the member stored at `index`
pub(super) fn position_at(index: usize) -> Position {
    Position::try_from(index + 1).unwrap_or(Position::MAX)
}

/// Index of the member holding `position`; callers validate the range first
pub(super) fn index_of(position: Position) -> usize {
    usize::try_from(position - 1).unwrap_or(0)
}
