//! Plan channels seen from the command path

use assert_matches::assert_matches;
use serde_json::json;

use crate::common::{entry_ids, seeded_plan, OWNER};
use tripboard::backend::itinerary::{
    apply_day_place_command, apply_day_schedule_command, delete_owned_plan, MutationError,
};
use tripboard::shared::itinerary::{
    DayPlaceChange, DayPlaceCommand, DayScheduleCommand, PlanChange, UserId,
};
use tripboard::shared::{EventPayload, EventType};

#[tokio::test]
async fn test_every_subscriber_gets_the_returned_event() {
    let seeded = seeded_plan(&[2, 1]).await;
    let state = &seeded.state;
    let mut first = state.channels.subscribe(seeded.plan);
    let mut second = state.channels.subscribe(seeded.plan);

    let event = assert_ok!(
        apply_day_place_command(
            &state.service,
            &state.channels,
            seeded.plan,
            OWNER,
            DayPlaceCommand::UpdateOuter {
                day_schedule_id: seeded.days[0],
                day_place_id: seeded.entries[0][0],
                modified_day_schedule_id: seeded.days[1],
                index_order: 1,
                modified_index_order: 2,
            },
        )
        .await
    );

    assert_eq!(first.recv().await.unwrap(), event);
    assert_eq!(second.recv().await.unwrap(), event);
    assert_matches!(
        event.event,
        EventPayload::DayPlace(DayPlaceChange::UpdateOuter { ref target_order, .. }) if target_order.len() == 2
    );
}

#[tokio::test]
async fn test_other_plans_hear_nothing() {
    let seeded = seeded_plan(&[1]).await;
    let other = assert_ok!(seeded.service().create_plan("Elsewhere", UserId(2)).await);
    let mut unrelated = seeded.state.channels.subscribe(other.plan_id);

    assert_ok!(
        apply_day_schedule_command(
            seeded.service(),
            &seeded.state.channels,
            seeded.plan,
            OWNER,
            DayScheduleCommand::Create {
                title: "Day 2".into(),
            },
        )
        .await
    );
    assert!(unrelated.try_recv().is_err());
}

#[tokio::test]
async fn test_drag_preview_is_relayed_but_never_stored() {
    let seeded = seeded_plan(&[3]).await;
    let mut rx = seeded.state.channels.subscribe(seeded.plan);

    let event = assert_ok!(
        apply_day_place_command(
            seeded.service(),
            &seeded.state.channels,
            seeded.plan,
            OWNER,
            DayPlaceCommand::Move {
                preview: json!({ "day_place_id": seeded.entries[0][2].get(), "hover_index": 1 }),
            },
        )
        .await
    );

    let received = rx.recv().await.unwrap();
    assert_eq!(received.event_type(), EventType::Preview);
    assert!(!received.event_type().is_durable());
    assert_eq!(received, event);
    assert_eq!(
        entry_ids(seeded.service(), seeded.plan, seeded.days[0]).await,
        seeded.entries[0]
    );
}

#[tokio::test]
async fn test_rejected_command_is_not_broadcast() {
    let seeded = seeded_plan(&[2]).await;
    let mut rx = seeded.state.channels.subscribe(seeded.plan);

    let result = apply_day_place_command(
        seeded.service(),
        &seeded.state.channels,
        seeded.plan,
        OWNER,
        DayPlaceCommand::UpdateInner {
            day_schedule_id: seeded.days[0],
            day_place_id: seeded.entries[0][0],
            index_order: 2,
            modified_index_order: 1,
        },
    )
    .await;

    assert!(result.is_err());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_shutdown_ends_subscriptions() {
    let seeded = seeded_plan(&[0]).await;
    let mut rx = seeded.state.channels.subscribe(seeded.plan);
    seeded.state.channels.shutdown();

    assert!(rx.recv().await.is_err());
    assert_eq!(seeded.state.channels.get_subscriber_count(seeded.plan), 0);
}

#[tokio::test]
async fn test_deleting_plan_removes_days_and_entries_but_keeps_places() {
    let seeded = seeded_plan(&[2, 1]).await;
    let state = &seeded.state;
    let mut rx = state.channels.subscribe(seeded.plan);

    let event = assert_ok!(delete_owned_plan(&state.service, &state.channels, seeded.plan, OWNER).await);
    assert_matches!(
        &event.event,
        EventPayload::Plan(PlanChange::Delete { plan_id, day_schedule_ids })
            if *plan_id == seeded.plan && *day_schedule_ids == seeded.days
    );

    assert_eq!(rx.recv().await.unwrap(), event);
    assert!(rx.recv().await.is_err());
    assert_eq!(state.channels.get_subscriber_count(seeded.plan), 0);

    assert_matches!(
        seeded.service().plan_schedule(seeded.plan).await,
        Err(MutationError::NotFound { .. })
    );
    for day in &seeded.days {
        assert_matches!(
            seeded.service().day_schedule(seeded.plan, *day).await,
            Err(MutationError::NotFound { .. })
        );
    }

    let mut tx = assert_ok!(seeded.service().store().begin().await);
    for day in &seeded.days {
        assert!(assert_ok!(tx.entry_orders(*day).await).is_empty());
    }
    assert!(assert_ok!(tx.place_exists(seeded.place).await));
    drop(tx);

    // The shared place is still usable from another plan
    let other = assert_ok!(seeded.service().create_plan("Elsewhere", OWNER).await);
    assert_ok!(
        apply_day_schedule_command(
            seeded.service(),
            &state.channels,
            other.plan_id,
            OWNER,
            DayScheduleCommand::Create { title: "Day 1".into() },
        )
        .await
    );
    let day = assert_ok!(seeded.service().plan_schedule(other.plan_id).await).days[0].day_schedule_id;
    assert_ok!(seeded.service().create_place(other.plan_id, day, seeded.place, None, None).await);
}
