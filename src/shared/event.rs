/**
 * Real-time Event System
 *
 * Envelope for everything relayed to the collaborators of a plan: committed
 * day and entry changes, live drag previews and cursor positions. Deleting
 * the plan publishes one final `plan` event before the channel closes.
 *
 * # Wire Format
 *
 * ```json
 * {
 *   "event_id": "1c8f...",
 *   "plan_id": 3,
 *   "sender": 7,
 *   "timestamp": "2025-01-01T10:00:00+00:00",
 *   "event_type": "day_place",
 *   "payload": {"action": "UPDATE_INNER", ...}
 * }
 * ```
 */
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::shared::itinerary::{
    CursorPosition, DayPlaceChange, DayScheduleChange, DragPreview, PlanChange, PlanId, UserId,
};

/// Kind of a real-time event, used for subscription filtering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Plan,
    DaySchedule,
    DayPlace,
    Preview,
    Cursor,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Plan,
        EventType::DaySchedule,
        EventType::DayPlace,
        EventType::Preview,
        EventType::Cursor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::DaySchedule => "day_schedule",
            Self::DayPlace => "day_place",
            Self::Preview => "preview",
            Self::Cursor => "cursor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|event_type| event_type.as_str() == value)
    }

    /// Whether events of this kind are stored before they are relayed
    pub fn is_durable(self) -> bool {
        matches!(self, Self::Plan | Self::DaySchedule | Self::DayPlace)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event_type", content = "payload", rename_all = "snake_case")]
pub enum EventPayload {
    Plan(PlanChange),
    DaySchedule(DayScheduleChange),
    DayPlace(DayPlaceChange),
    Preview(DragPreview),
    Cursor(CursorPosition),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeEvent {
    pub event_id: Uuid,
    pub plan_id: PlanId,
    pub sender: Option<UserId>,
    pub timestamp: String,
    #[serde(flatten)]
    pub event: EventPayload,
}

impl RealtimeEvent {
    pub fn new(plan_id: PlanId, event: EventPayload) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            plan_id,
            sender: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            event,
        }
    }

    pub fn plan(plan_id: PlanId, change: PlanChange) -> Self {
        Self::new(plan_id, EventPayload::Plan(change))
    }

    pub fn day_schedule(plan_id: PlanId, change: DayScheduleChange) -> Self {
        Self::new(plan_id, EventPayload::DaySchedule(change))
    }

    pub fn day_place(plan_id: PlanId, change: DayPlaceChange) -> Self {
        Self::new(plan_id, EventPayload::DayPlace(change))
    }

    pub fn preview(plan_id: PlanId, preview: DragPreview) -> Self {
        Self::new(plan_id, EventPayload::Preview(preview))
    }

    pub fn cursor(plan_id: PlanId, cursor: CursorPosition) -> Self {
        Self::new(plan_id, EventPayload::Cursor(cursor))
    }

    pub fn with_sender(mut self, sender: UserId) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn event_type(&self) -> EventType {
        match self.event {
            EventPayload::Plan(_) => EventType::Plan,
            EventPayload::DaySchedule(_) => EventType::DaySchedule,
            EventPayload::DayPlace(_) => EventType::DayPlace,
            EventPayload::Preview(_) => EventType::Preview,
            EventPayload::Cursor(_) => EventType::Cursor,
        }
    }
}
