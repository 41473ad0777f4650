//! Scope Lock Module
//!
//! Exclusive per-scope locking for itinerary mutations. Every operation that
//! reads and rewrites the positions of a scope holds that scope's lock from
//! before the first position read until after its writes are committed.
//!
//! # Architecture
//!
//! - **`scope`** - `ScopeId`, the closed set of lockable scopes and their
//!   canonical order
//! - **`registry`** - `ScopeLocks`, the process-wide registry of async
//!   mutexes, and `ScopeGuard`, which releases every lock it holds on drop
//!
//! # Deadlock Freedom
//!
//! Multi-scope operations (moving an entry between two days, deleting a day
//! together with its entries) acquire their scopes in the order given by
//! `ScopeId`'s `Ord`, never in argument order. Two opposite moves between
//! the same pair of days therefore contend for the same first lock.
//!
//! # Cancellation
//!
//! Acquisition is an ordinary future. Dropping it while it waits leaves no
//! lock held, and dropping a `ScopeGuard` releases all of its locks.

pub mod scope;
pub mod registry;

pub use registry::{LockError, ScopeGuard, ScopeLocks};
pub use scope::ScopeId;
