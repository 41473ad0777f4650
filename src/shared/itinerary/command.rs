/**
 * Itinerary Commands
 *
 * Closed sets of operations a collaborator can send for a plan. The JSON
 * form is tagged by `action`:
 *
 * ```json
 * {"action": "UPDATE_SCHEDULE", "day_schedule_id": 4, "day_order": 3, "modified_day_order": 1}
 * ```
 *
 * `MOVE` variants carry a live drag preview. They are relayed to the other
 * collaborators as-is and never reach storage.
 */

use serde::{Deserialize, Serialize};

use super::ids::{DayPlaceId, DayScheduleId, PlaceId};
use crate::shared::ordering::Position;

/// Operations on the day list of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayScheduleCommand {
    Create {
        title: String,
    },
    Rename {
        day_schedule_id: DayScheduleId,
        title: String,
    },
    Move {
        #[serde(default)]
        preview: serde_json::Value,
    },
    UpdateSchedule {
        day_schedule_id: DayScheduleId,
        day_order: Position,
        modified_day_order: Position,
    },
    Delete {
        day_schedule_id: DayScheduleId,
    },
}

/// Operations on the entries of a plan's days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayPlaceCommand {
    Create {
        day_schedule_id: DayScheduleId,
        place_id: PlaceId,
        /// Append when absent
        #[serde(default)]
        index_order: Option<Position>,
        #[serde(default)]
        memo: Option<String>,
    },
    Rename {
        day_schedule_id: DayScheduleId,
        day_place_id: DayPlaceId,
        #[serde(default)]
        memo: Option<String>,
    },
    Move {
        #[serde(default)]
        preview: serde_json::Value,
    },
    UpdateInner {
        day_schedule_id: DayScheduleId,
        day_place_id: DayPlaceId,
        index_order: Position,
        modified_index_order: Position,
    },
    UpdateOuter {
        day_schedule_id: DayScheduleId,
        day_place_id: DayPlaceId,
        modified_day_schedule_id: DayScheduleId,
        index_order: Position,
        modified_index_order: Position,
    },
    Delete {
        day_schedule_id: DayScheduleId,
        day_place_id: DayPlaceId,
    },
}

impl DayScheduleCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::Create { .. } => "CREATE",
            Self::Rename { .. } => "RENAME",
            Self::Move { .. } => "MOVE",
            Self::UpdateSchedule { .. } => "UPDATE_SCHEDULE",
            Self::Delete { .. } => "DELETE",
        }
    }
}

impl DayPlaceCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::Create { .. } => "CREATE",
            Self::Rename { .. } => "RENAME",
            Self::Move { .. } => "MOVE",
            Self::UpdateInner { .. } => "UPDATE_INNER",
            Self::UpdateOuter { .. } => "UPDATE_OUTER",
            Self::Delete { .. } => "DELETE",
        }
    }
}
