/**
 * Reorder Engine
 *
 * Position-changing operations on a `PositionedList`. Each operation either
 * applies completely or returns an error with the list untouched, and each
 * reports the siblings it shifted so the caller can persist exactly the rows
 * that changed.
 *
 * # Validation Order
 *
 * Moves check membership first (`NotInScope`), then that the caller's
 * expected position lies in `1..=count` (`InvalidPosition`), then its
 * staleness (`Conflict`), then the target range (`InvalidPosition`).
 *
 * # Ranges
 *
 * - insert: `1..=count + 1`
 * - move within a scope: `1..=count`
 * - move across scopes: `1..=count(target) + 1`
 */

use std::fmt;

use super::error::OrderingError;
use super::positioned_list::{index_of, position_at, PositionedList};
use super::Position;

/// A sibling pushed from one position to another by an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift<K> {
    pub id: K,
    pub from: Position,
    pub to: Position,
}

/// Result of a single-scope operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<K> {
    /// Final position of the subject item (for a removal, the slot it vacated)
    pub position: Position,
    /// Siblings whose position changed
    pub shifted: Vec<Shift<K>>,
}

impl<K: Clone> Outcome<K> {
    /// `(item, new position)` rows for every shifted sibling
    pub fn assignments(&self) -> Vec<(K, Position)> {
        self.shifted
            .iter()
            .map(|shift| (shift.id.clone(), shift.to))
            .collect()
    }
}

/// Result of moving an item from one scope into another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossMove<K> {
    pub previous: Position,
    pub position: Position,
    /// Members of the source scope that closed the gap
    pub source: Vec<Shift<K>>,
    /// Members of the target scope that opened the slot
    pub target: Vec<Shift<K>>,
}

impl<S, K> PositionedList<S, K>
where
    S: fmt::Display,
    K: Clone + PartialEq + fmt::Display,
{
    /// Place `item` after the last member
    pub fn append(&mut self, item: K) -> Result<Outcome<K>, OrderingError> {
        self.ensure_absent(&item)?;
        let position = self.next_position();
        self.members.push(item);
        Ok(Outcome {
            position,
            shifted: Vec::new(),
        })
    }

    /// Check that `position` is a valid insertion slot without changing anything
    pub fn validate_insert(&self, position: Position) -> Result<(), OrderingError> {
        let max = self.next_position();
        if position < 1 || position > max {
            return Err(OrderingError::invalid_position(position, max));
        }
        Ok(())
    }

    /// Insert `item` at `position`, pushing every member at or after it down by one
    pub fn insert_at(&mut self, item: K, position: Position) -> Result<Outcome<K>, OrderingError> {
        self.ensure_absent(&item)?;
        self.validate_insert(position)?;

        let index = index_of(position);
        self.members.insert(index, item);

        let shifted = (index + 1..self.members.len())
            .map(|i| {
                let to = position_at(i);
                Shift {
                    id: self.members[i].clone(),
                    from: to - 1,
                    to,
                }
            })
            .collect();

        Ok(Outcome { position, shifted })
    }

    /// Move `item` from `expected` to `new_position` inside this scope
    ///
    /// A move onto its own position is accepted and changes nothing. An
    /// `expected` outside `1..=count` can never have been observed, so it is
    /// `InvalidPosition` rather than `Conflict`.
    pub fn move_within(
        &mut self,
        item: &K,
        expected: Position,
        new_position: Position,
    ) -> Result<Outcome<K>, OrderingError> {
        self.ensure_at(item, expected)?;

        let count = self.count();
        if new_position < 1 || new_position > count {
            return Err(OrderingError::invalid_position(new_position, count));
        }

        if new_position == expected {
            return Ok(Outcome {
                position: new_position,
                shifted: Vec::new(),
            });
        }

        let from = index_of(expected);
        let to = index_of(new_position);
        let moved = self.members.remove(from);
        self.members.insert(to, moved);

        // Members between the two slots moved one step toward the vacated one.
        let step = if new_position < expected { -1 } else { 1 };
        let shifted = (from.min(to)..=from.max(to))
            .filter(|i| *i != to)
            .map(|i| {
                let now = position_at(i);
                Shift {
                    id: self.members[i].clone(),
                    from: now + step,
                    to: now,
                }
            })
            .collect();

        Ok(Outcome {
            position: new_position,
            shifted,
        })
    }

    /// Remove `item`, pulling every later member up by one
    pub fn remove(&mut self, item: &K) -> Result<Outcome<K>, OrderingError> {
        let position = self
            .position_of(item)
            .ok_or_else(|| OrderingError::NotInScope {
                item: item.to_string(),
            })?;

        let index = index_of(position);
        self.members.remove(index);

        let shifted = (index..self.members.len())
            .map(|i| {
                let to = position_at(i);
                Shift {
                    id: self.members[i].clone(),
                    from: to + 1,
                    to,
                }
            })
            .collect();

        Ok(Outcome { position, shifted })
    }

    fn ensure_absent(&self, item: &K) -> Result<(), OrderingError> {
        if self.contains(item) {
            return Err(OrderingError::DuplicateItem {
                item: item.to_string(),
            });
        }
        Ok(())
    }

    fn ensure_at(&self, item: &K, expected: Position) -> Result<(), OrderingError> {
        let actual = self
            .position_of(item)
            .ok_or_else(|| OrderingError::NotInScope {
                item: item.to_string(),
            })?;
        let count = self.count();
        if expected < 1 || expected > count {
            return Err(OrderingError::invalid_position(expected, count));
        }
        if actual != expected {
            return Err(OrderingError::Conflict {
                item: item.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// Move `item` out of `source` and into `target` at `new_position`
///
/// Both lists must be images of two different scopes loaded under their
/// locks. Either both are updated or neither is.
pub fn move_across<S, K>(
    source: &mut PositionedList<S, K>,
    target: &mut PositionedList<S, K>,
    item: &K,
    expected: Position,
    new_position: Position,
) -> Result<CrossMove<K>, OrderingError>
where
    S: fmt::Display,
    K: Clone + PartialEq + fmt::Display,
{
    source.ensure_at(item, expected)?;
    target.ensure_absent(item)?;
    target.validate_insert(new_position)?;

    let removed = source.remove(item)?;
    let inserted = target.insert_at(item.clone(), new_position)?;

    Ok(CrossMove {
        previous: removed.position,
        position: inserted.position,
        source: removed.shifted,
        target: inserted.shifted,
    })
}
