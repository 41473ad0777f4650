//! Common test utilities and helpers
//!
//! - Custom assertion macros
//! - In-memory application fixtures with a seeded plan
//! - PostgreSQL fixture, used only when `DATABASE_URL` is set

#[cfg(feature = "ssr")]
pub mod database;

#[cfg(feature = "ssr")]
pub use database::*;
#[cfg(feature = "ssr")]
pub use fixtures::*;
