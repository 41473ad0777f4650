//! Backend Error Module
//!
//! Error types returned by HTTP handlers and their conversion to responses.
//!
//! # Architecture
//!
//! - **`types`** - `BackendError`, status and kind mapping
//! - **`conversion`** - `IntoResponse` and the JSON error body
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! Itinerary failures arrive as `MutationError` and are wrapped by
//! `BackendError::Mutation` through `?`.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use conversion::ErrorBody;
pub use types::BackendError;
