//! Itinerary Module
//!
//! Server-side orchestration of plan edits: the reorder engine from
//! `shared::ordering` run against stored days and entries, under scope
//! locks, with the committed result published to the plan's channel.
//!
//! # Architecture
//!
//! - **`service`** - `ItineraryService`, one method per mutation and read
//! - **`result`** - `MutationError` and the failure kinds callers see
//! - **`membership`** - participant gate, join requests, approval and plan deletion
//! - **`dispatch`** - command enum to service call to published event
//!
//! # Module Structure
//!
//! ```text
//! itinerary/
//! ├── mod.rs        - Module exports and documentation
//! ├── service.rs    - Lock, load, reorder, write, commit
//! ├── result.rs     - Mutation failure kinds
//! ├── membership.rs - Participant gate
//! └── dispatch.rs   - Command handling and broadcast
//! ```
//!
//! # Flow
//!
//! ```text
//! route handler
//!   -> require_participant
//!   -> apply_day_schedule_command / apply_day_place_command
//!        -> ItineraryService (locks + unit of work + engine)
//!        -> PlanChannels::publish
//!   <- RealtimeEvent (same value every subscriber receives)
//! ```

pub mod dispatch;
pub mod membership;
pub mod result;
pub mod service;

pub use dispatch::{apply_day_place_command, apply_day_schedule_command, relay_cursor, relay_preview};
pub use membership::{
    approve_participant, delete_owned_plan, deny_participant, join_plan, require_participant,
};
pub use result::{MutationError, MutationResult};
pub use service::ItineraryService;
