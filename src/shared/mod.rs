//! Shared Module
//!
//! Types and logic that do not depend on the server runtime: the ordered
//! list engine, itinerary records and commands, real-time event envelopes,
//! configuration and shared errors. Everything here is serializable and can
//! be used by clients as well as by the backend.
//!
//! # Module Structure
//!
//! ```text
//! shared/
//! ├── mod.rs        - Module exports and documentation
//! ├── ordering/     - PositionedList and the reorder engine
//! ├── itinerary/    - Ids, records, commands, changes, previews
//! ├── event.rs      - Real-time event envelope
//! ├── config/       - AppConfig and layered loading
//! └── error.rs      - SharedError
//! ```

/// Ordered-list position management
pub mod ordering;

/// Itinerary domain types
pub mod itinerary;

/// Real-time event system
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use event::{EventPayload, EventType, RealtimeEvent};
pub use ordering::{OrderedEntry, OrderingError, Position, PositionedList};
