//! Middleware Module
//!
//! Request processing that runs before handlers.
//!
//! - **`identity`** - `Caller` extractor reading the forwarded user id
//!
//! Request tracing is a `tower_http::trace::TraceLayer` installed by the
//! router.

pub mod identity;

pub use identity::{Caller, USER_ID_HEADER};
