//! Server Module
//!
//! Initialization and state of the Axum HTTP server.
//!
//! # Architecture
//!
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`config`** - Database pool setup and migrations
//! - **`init`** - State assembly, router creation, maintenance task
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Database loading
//! └── init.rs   - Server initialization and app creation
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use tripboard::backend::server::create_app;
//! use tripboard::shared::AppConfig;
//!
//! # async fn example() {
//! let (app, state) = create_app(AppConfig::default()).await;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! state.channels.shutdown();
//! # }
//! ```

/// Application state management
pub mod state;

/// Database setup
pub mod config;

/// Server initialization
pub mod init;

pub use init::{build_state, create_app, spawn_maintenance};
pub use state::AppState;
