//! Ephemeral collaboration signals
//!
//! Drag previews and cursor positions are relayed to the other collaborators
//! on a plan and forgotten. They carry no ordering or durability guarantee.

use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Which list a drag preview is hovering over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewTarget {
    DaySchedule,
    DayPlace,
}

/// In-progress drag, passed through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPreview {
    pub target: PreviewTarget,
    pub payload: serde_json::Value,
}

/// A collaborator's pointer on the shared board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub user_id: UserId,
    pub x: f64,
    pub y: f64,
}
