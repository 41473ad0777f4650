//! Ordered-List Position Management
//!
//! This module keeps "positioned items in a scoped list" consistent. A scope
//! is the parent of a list (a plan for its days, a day for its entries) and
//! every member carries a 1-based position. The positions of one scope always
//! form the dense permutation `1..=count`.
//!
//! # Architecture
//!
//! - **`positioned_list`** - `PositionedList`, the in-memory image of one scope
//!   loaded under lock, plus the density check that guards it
//! - **`engine`** - the reorder operations (append, insert, move within a
//!   scope, move across scopes, remove) and their outcomes
//! - **`error`** - `OrderingError`
//!
//! # Module Structure
//!
//! ```text
//! ordering/
//! ├── mod.rs             - Module exports and documentation
//! ├── positioned_list.rs - Scope image and invariant check
//! ├── engine.rs          - Reorder operations
//! └── error.rs           - Error taxonomy
//! ```
//!
//! # Usage
//!
//! Everything here is pure and synchronous. The caller is responsible for
//! holding the scope lock while it loads a list, runs an operation and
//! persists the resulting position changes.
//!
//! ```rust
//! use tripboard::shared::ordering::PositionedList;
//!
//! let mut days = PositionedList::from_positions(1_i64, vec![(10_i64, 1), (11, 2), (12, 3)]).unwrap();
//! let outcome = days.move_within(&12, 3, 1).unwrap();
//! assert_eq!(outcome.position, 1);
//! assert_eq!(days.keys().copied().collect::<Vec<_>>(), vec![12, 10, 11]);
//! ```

/// Scope image and invariant check
pub mod positioned_list;

/// Reorder operations
pub mod engine;

/// Ordering error taxonomy
pub mod error;

use serde::{Deserialize, Serialize};

/// 1-based rank of an item within its scope
pub type Position = i32;

/// One member of a scope together with its canonical position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedEntry<K> {
    pub id: K,
    pub position: Position,
}

pub use engine::{move_across, CrossMove, Outcome, Shift};
pub use error::OrderingError;
pub use positioned_list::PositionedList;
