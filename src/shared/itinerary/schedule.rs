/**
 * Itinerary Records and Read Models
 *
 * Row shapes for plans, days, entries and the places entries point at,
 * plus the nested views returned by read queries. Days in a view are sorted
 * by `day_order`, entries by `index_order`.
 *
 * # Text Rules
 *
 * Day titles are trimmed and must hold 1 to 100 characters. Memos hold at
 * most 500 characters; a blank memo clears it.
 */

use serde::{Deserialize, Serialize};

use super::ids::{DayPlaceId, DayScheduleId, PlaceId, PlanId, UserId};
use crate::shared::error::SharedError;
use crate::shared::ordering::Position;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_MEMO_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: PlanId,
    pub title: String,
    pub owner: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day_schedule_id: DayScheduleId,
    pub plan_id: PlanId,
    pub day_order: Position,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlace {
    pub day_place_id: DayPlaceId,
    pub day_schedule_id: DayScheduleId,
    pub place_id: PlaceId,
    pub index_order: Position,
    pub memo: Option<String>,
}

/// A visitable place; read-only from the itinerary's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub place_id: PlaceId,
    pub google_place_id: String,
    pub place_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

/// Fields needed to register a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlace {
    pub google_place_id: String,
    pub place_name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: Option<String>,
}

/// Membership state of a user in a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    Approved,
    Pending,
}

impl ParticipantStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "approved" => Some(Self::Approved),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Whole itinerary of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSchedule {
    pub plan_id: PlanId,
    pub title: String,
    pub days: Vec<DayScheduleView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayScheduleView {
    pub day_schedule_id: DayScheduleId,
    pub day_order: Position,
    pub title: String,
    pub places: Vec<DayPlaceView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlaceView {
    pub day_place_id: DayPlaceId,
    pub index_order: Position,
    pub memo: Option<String>,
    pub place: Place,
}

/// Trim and check a day or plan title
pub fn normalize_title(title: &str) -> Result<String, SharedError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(SharedError::validation("title", "title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(SharedError::validation(
            "title",
            format!("title cannot exceed {MAX_TITLE_CHARS} characters"),
        ));
    }
    Ok(title.to_string())
}

/// Trim and check a memo; blank input clears the memo
pub fn normalize_memo(memo: Option<&str>) -> Result<Option<String>, SharedError> {
    let Some(memo) = memo.map(str::trim).filter(|memo| !memo.is_empty()) else {
        return Ok(None);
    };
    if memo.chars().count() > MAX_MEMO_CHARS {
        return Err(SharedError::validation(
            "memo",
            format!("memo cannot exceed {MAX_MEMO_CHARS} characters"),
        ));
    }
    Ok(Some(memo.to_string()))
}
