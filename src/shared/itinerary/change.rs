/**
 * Committed Changes
 *
 * The canonical outcome of a committed itinerary mutation. The same value
 * is returned to the collaborator who made the change and published to
 * everyone else on the plan, so all clients converge on the positions the
 * server computed instead of re-deriving them.
 *
 * Every variant that touches positions carries the full final order of the
 * affected scope(s).
 */

use serde::{Deserialize, Serialize};

use super::ids::{DayPlaceId, DayScheduleId, PlaceId, PlanId};
use crate::shared::ordering::{OrderedEntry, Position};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayScheduleChange {
    Create {
        day_schedule_id: DayScheduleId,
        title: String,
        day_order: Position,
        order: Vec<OrderedEntry<DayScheduleId>>,
    },
    Rename {
        day_schedule_id: DayScheduleId,
        title: String,
    },
    UpdateSchedule {
        day_schedule_id: DayScheduleId,
        day_order: Position,
        modified_day_order: Position,
        order: Vec<OrderedEntry<DayScheduleId>>,
    },
    Delete {
        day_schedule_id: DayScheduleId,
        order: Vec<OrderedEntry<DayScheduleId>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayPlaceChange {
    Create {
        day_schedule_id: DayScheduleId,
        day_place_id: DayPlaceId,
        place_id: PlaceId,
        index_order: Position,
        memo: Option<String>,
        order: Vec<OrderedEntry<DayPlaceId>>,
    },
    Rename {
        day_schedule_id: DayScheduleId,
        day_place_id: DayPlaceId,
        memo: Option<String>,
    },
    UpdateInner {
        day_schedule_id: DayScheduleId,
        day_place_id: DayPlaceId,
        index_order: Position,
        modified_index_order: Position,
        order: Vec<OrderedEntry<DayPlaceId>>,
    },
    UpdateOuter {
        day_place_id: DayPlaceId,
        day_schedule_id: DayScheduleId,
        modified_day_schedule_id: DayScheduleId,
        index_order: Position,
        modified_index_order: Position,
        source_order: Vec<OrderedEntry<DayPlaceId>>,
        target_order: Vec<OrderedEntry<DayPlaceId>>,
    },
    Delete {
        day_schedule_id: DayScheduleId,
        day_place_id: DayPlaceId,
        order: Vec<OrderedEntry<DayPlaceId>>,
    },
}

/// A change to the plan itself
///
/// `Delete` is the last event a plan's channel carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanChange {
    Delete {
        plan_id: PlanId,
        day_schedule_ids: Vec<DayScheduleId>,
    },
}

impl DayScheduleChange {
    /// Final day order of the plan, if this change moved any day
    pub fn order(&self) -> Option<&[OrderedEntry<DayScheduleId>]> {
        match self {
            Self::Create { order, .. } | Self::UpdateSchedule { order, .. } | Self::Delete { order, .. } => {
                Some(order.as_slice())
            }
            Self::Rename { .. } => None,
        }
    }
}
