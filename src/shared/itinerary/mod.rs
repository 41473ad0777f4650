//! Itinerary Domain Types
//!
//! Types describing a plan's itinerary: typed ids, stored records and read
//! views, the commands collaborators send, the canonical changes the server
//! answers with, and the ephemeral preview/cursor signals.
//!
//! # Module Structure
//!
//! ```text
//! itinerary/
//! ├── mod.rs      - Module exports and documentation
//! ├── ids.rs      - Typed identifiers
//! ├── schedule.rs - Records, read views, text rules
//! ├── command.rs  - Inbound command enums
//! ├── change.rs   - Committed change enums
//! └── preview.rs  - Drag preview and cursor signals
//! ```

pub mod ids;
pub mod schedule;
pub mod command;
pub mod change;
pub mod preview;

pub use change::{DayPlaceChange, DayScheduleChange, PlanChange};
pub use command::{DayPlaceCommand, DayScheduleCommand};
pub use ids::{DayPlaceId, DayScheduleId, PlaceId, PlanId, UserId};
pub use preview::{CursorPosition, DragPreview, PreviewTarget};
pub use schedule::{
    normalize_memo, normalize_title, DayPlace, DayPlaceView, DaySchedule, DayScheduleView, NewPlace,
    ParticipantStatus, Place, Plan, PlanSchedule,
};
