//! Route Configuration Module
//!
//! HTTP routes of the backend server.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation, health check, tracing layer
//! - **`itinerary_routes`** - Plan, day, entry and relay handlers
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs              - Module exports and documentation
//! ├── router.rs           - Main router creation
//! └── itinerary_routes.rs - Itinerary endpoint handlers
//! ```
//!
//! # Identity
//!
//! Every route except `/health` expects the `x-user-id` header set by the
//! upstream authentication layer.

/// Main router creation
pub mod router;

/// Itinerary endpoint handlers
pub mod itinerary_routes;

pub use router::create_router;
