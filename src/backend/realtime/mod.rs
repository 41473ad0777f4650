//! Real-time Update Module
//!
//! Relays plan events to every connected collaborator of that plan.
//!
//! # Architecture
//!
//! - **`broadcast`** - `PlanChannels`, the per-plan channel registry
//! - **`subscription`** - Server-Sent Events subscription handler
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── broadcast.rs    - Channel registry and broadcasting
//! └── subscription.rs - SSE subscription handler
//! ```
//!
//! # Event Types
//!
//! - `day_schedule` - committed change to a plan's day list
//! - `day_place` - committed change to a day's entry list
//! - `preview` - drag in progress, never stored
//! - `cursor` - collaborator pointer position, never stored
//!
//! Only the first two are durable. Previews and cursors are best-effort and
//! a client must never treat them as committed state.

/// Event broadcasting utilities
pub mod broadcast;

/// Server-Sent Events subscription handler
pub mod subscription;

pub use broadcast::{broadcast_event, PlanChannels, RealtimeEventBroadcast};
pub use subscription::handle_plan_subscription;
