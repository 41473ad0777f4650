//! Command dispatch
//!
//! Maps each command variant onto its service operation, wraps the
//! committed change in a `RealtimeEvent`, publishes it to the plan's channel
//! and hands the same event back to the caller. Preview variants skip the
//! service entirely and are relayed as received.
//!
//! Membership must already have been checked by the caller.

use crate::backend::realtime::PlanChannels;
use crate::shared::itinerary::{
    CursorPosition, DayPlaceCommand, DayScheduleCommand, DragPreview, PlanId, PreviewTarget, UserId,
};
use crate::shared::RealtimeEvent;

use super::result::MutationResult;
use super::service::ItineraryService;

pub async fn apply_day_schedule_command(
    service: &ItineraryService,
    channels: &PlanChannels,
    plan: PlanId,
    sender: UserId,
    command: DayScheduleCommand,
) -> MutationResult<RealtimeEvent> {
    tracing::debug!(%plan, %sender, action = command.action(), "[Schedule] command received");

    let change = match command {
        DayScheduleCommand::Move { preview } => {
            return Ok(relay_preview(channels, plan, sender, PreviewTarget::DaySchedule, preview));
        }
        DayScheduleCommand::Create { title } => service.create_day(plan, &title).await?,
        DayScheduleCommand::Rename {
            day_schedule_id,
            title,
        } => service.rename_day(plan, day_schedule_id, &title).await?,
        DayScheduleCommand::UpdateSchedule {
            day_schedule_id,
            day_order,
            modified_day_order,
        } => {
            service
                .move_day(plan, day_schedule_id, day_order, modified_day_order)
                .await?
        }
        DayScheduleCommand::Delete { day_schedule_id } => service.delete_day(plan, day_schedule_id).await?,
    };

    let event = RealtimeEvent::day_schedule(plan, change).with_sender(sender);
    channels.publish(event.clone());
    Ok(event)
}

pub async fn apply_day_place_command(
    service: &ItineraryService,
    channels: &PlanChannels,
    plan: PlanId,
    sender: UserId,
    command: DayPlaceCommand,
) -> MutationResult<RealtimeEvent> {
    tracing::debug!(%plan, %sender, action = command.action(), "[Place] command received");

    let change = match command {
        DayPlaceCommand::Move { preview } => {
            return Ok(relay_preview(channels, plan, sender, PreviewTarget::DayPlace, preview));
        }
        DayPlaceCommand::Create {
            day_schedule_id,
            place_id,
            index_order,
            memo,
        } => {
            service
                .create_place(plan, day_schedule_id, place_id, index_order, memo.as_deref())
                .await?
        }
        DayPlaceCommand::Rename {
            day_schedule_id,
            day_place_id,
            memo,
        } => {
            service
                .rename_memo(plan, day_schedule_id, day_place_id, memo.as_deref())
                .await?
        }
        DayPlaceCommand::UpdateInner {
            day_schedule_id,
            day_place_id,
            index_order,
            modified_index_order,
        } => {
            service
                .move_place_within(plan, day_schedule_id, day_place_id, index_order, modified_index_order)
                .await?
        }
        DayPlaceCommand::UpdateOuter {
            day_schedule_id,
            day_place_id,
            modified_day_schedule_id,
            index_order,
            modified_index_order,
        } => {
            service
                .move_place_across(
                    plan,
                    day_schedule_id,
                    day_place_id,
                    modified_day_schedule_id,
                    index_order,
                    modified_index_order,
                )
                .await?
        }
        DayPlaceCommand::Delete {
            day_schedule_id,
            day_place_id,
        } => service.delete_place(plan, day_schedule_id, day_place_id).await?,
    };

    let event = RealtimeEvent::day_place(plan, change).with_sender(sender);
    channels.publish(event.clone());
    Ok(event)
}

/// Relay a drag preview without validating or storing it
pub fn relay_preview(
    channels: &PlanChannels,
    plan: PlanId,
    sender: UserId,
    target: PreviewTarget,
    payload: serde_json::Value,
) -> RealtimeEvent {
    let event = RealtimeEvent::preview(plan, DragPreview { target, payload }).with_sender(sender);
    channels.publish(event.clone());
    event
}

/// Relay a collaborator's cursor position
pub fn relay_cursor(channels: &PlanChannels, plan: PlanId, sender: UserId, x: f64, y: f64) -> RealtimeEvent {
    let event = RealtimeEvent::cursor(
        plan,
        CursorPosition {
            user_id: sender,
            x,
            y,
        },
    )
    .with_sender(sender);
    channels.publish(event.clone());
    event
}
