//! Backend Module
//!
//! Server-side code for the collaborative itinerary service: the Axum HTTP
//! server, the ordered-list mutations behind it and the per-plan real-time
//! relay.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, database setup
//! - **`routes`** - HTTP route configuration and handlers
//! - **`itinerary`** - Mutation service, membership, command dispatch
//! - **`lock`** - Per-scope exclusive locks with canonical ordering
//! - **`store`** - Memory and PostgreSQL storage behind one contract
//! - **`realtime`** - Per-plan broadcast channels and SSE subscription
//! - **`middleware`** - Caller identity extraction
//! - **`error`** - `BackendError` and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs       - Module exports and documentation
//! ├── main.rs      - Server binary
//! ├── server/      - Server initialization and state
//! ├── routes/      - Route configuration
//! ├── itinerary/   - Service, membership, dispatch
//! ├── lock/        - Scope locks
//! ├── store/       - Storage backends
//! ├── realtime/    - Event broadcasting
//! ├── middleware/  - Request extractors
//! └── error/       - Error types
//! ```
//!
//! # Concurrency
//!
//! Two mutations that touch the same scope run one after the other: each
//! holds the scope's lock from before its first position read until after
//! its commit. Mutations on different scopes run in parallel. Reads take no
//! scope lock and see the last committed state.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Itinerary mutations and membership
pub mod itinerary;

/// Scope locks
pub mod lock;

/// Storage backends
pub mod store;

/// Real-time update system
pub mod realtime;

/// Backend error types
pub mod error;

/// Request extractors
pub mod middleware;

pub use error::BackendError;
pub use itinerary::{ItineraryService, MutationError};
pub use realtime::PlanChannels;
pub use server::{create_app, AppState};
