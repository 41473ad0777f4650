//! Tripboard - Collaborative Trip Planning Backend
//!
//! Several collaborators edit one travel plan at the same time: they add,
//! rename, reorder and delete the days of the plan and the visit entries
//! inside each day, and everyone connected to the plan sees every committed
//! change immediately.
//!
//! # Module Structure
//!
//! - **`shared`** - Types usable without the server
//!   - `ordering`: the positioned-list engine (dense `1..=n` positions)
//!   - `itinerary`: ids, records, commands and committed changes
//!   - `event`: the `RealtimeEvent` envelope relayed to collaborators
//!   - `config`: layered `AppConfig`
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP routes and SSE subscriptions
//!   - Scope locks, storage and the mutation service
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - the Axum server and everything under `backend`
//!
//! # Ordering Guarantees
//!
//! After every committed mutation the positions of each scope (the days of
//! a plan, the entries of a day) are exactly `1..=n` with no gaps or
//! duplicates. A move carries the position the caller last saw; if that is
//! stale the move is rejected as a conflict instead of being applied on top
//! of someone else's change.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
