//! Itinerary mutations end to end through `ItineraryService`
//!
//! Each test seeds a plan in the memory store, runs one or more mutations
//! and checks both the returned change and the stored order.

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use crate::common::{day_ids, entry_ids, seeded_plan};
use tripboard::backend::MutationError;
use tripboard::shared::itinerary::{DayPlaceChange, DayScheduleChange, DayScheduleId, PlaceId};
use tripboard::shared::ordering::OrderedEntry;

#[tokio::test]
async fn test_move_last_day_to_front() {
    let seeded = seeded_plan(&[0, 0, 0]).await;
    let [a, b, c] = [seeded.days[0], seeded.days[1], seeded.days[2]];

    let change = assert_ok!(seeded.service().move_day(seeded.plan, c, 3, 1).await);

    assert_eq!(
        change,
        DayScheduleChange::UpdateSchedule {
            day_schedule_id: c,
            day_order: 3,
            modified_day_order: 1,
            order: vec![
                OrderedEntry { id: c, position: 1 },
                OrderedEntry { id: a, position: 2 },
                OrderedEntry { id: b, position: 3 },
            ],
        }
    );
    assert_eq!(day_ids(seeded.service(), seeded.plan).await, vec![c, a, b]);
}

#[tokio::test]
async fn test_insert_entry_in_the_middle() {
    let seeded = seeded_plan(&[2]).await;
    let day = seeded.days[0];
    let [a, b] = [seeded.entries[0][0], seeded.entries[0][1]];

    let change = assert_ok!(
        seeded
            .service()
            .create_place(seeded.plan, day, seeded.place, Some(2), Some("coffee"))
            .await
    );
    let x = match change {
        DayPlaceChange::Create {
            day_place_id,
            index_order: 2,
            ref memo,
            ..
        } if memo.as_deref() == Some("coffee") => day_place_id,
        other => panic!("unexpected change {other:?}"),
    };

    assert_eq!(entry_ids(seeded.service(), seeded.plan, day).await, vec![a, x, b]);
}

#[tokio::test]
async fn test_move_entry_to_another_day() {
    let seeded = seeded_plan(&[3, 1]).await;
    let [from, to] = [seeded.days[0], seeded.days[1]];
    let [a, b, c] = [seeded.entries[0][0], seeded.entries[0][1], seeded.entries[0][2]];
    let d = seeded.entries[1][0];

    let change = assert_ok!(
        seeded
            .service()
            .move_place_across(seeded.plan, from, b, to, 2, 1)
            .await
    );

    assert_matches!(
        change,
        DayPlaceChange::UpdateOuter {
            index_order: 2,
            modified_index_order: 1,
            ref source_order,
            ref target_order,
            ..
        } if source_order.len() == 2 && target_order.len() == 2
    );
    assert_eq!(entry_ids(seeded.service(), seeded.plan, from).await, vec![a, c]);
    assert_eq!(entry_ids(seeded.service(), seeded.plan, to).await, vec![b, d]);
}

#[tokio::test]
async fn test_out_of_range_move_leaves_day_unchanged() {
    let seeded = seeded_plan(&[2]).await;
    let day = seeded.days[0];
    let first = seeded.entries[0][0];

    let result = seeded
        .service()
        .move_place_within(seeded.plan, day, first, 1, 5)
        .await;

    assert_err!(result, MutationError::InvalidPosition { .. });
    assert_eq!(entry_ids(seeded.service(), seeded.plan, day).await, seeded.entries[0]);
}

#[tokio::test]
async fn test_stale_expected_position_conflicts() {
    let seeded = seeded_plan(&[0, 0, 0]).await;
    let a = seeded.days[0];
    assert_ok!(seeded.service().move_day(seeded.plan, a, 1, 2).await);

    let result = seeded.service().move_day(seeded.plan, a, 1, 3).await;
    assert_err!(result, MutationError::Conflict { .. });
}

#[tokio::test]
async fn test_move_to_same_position_is_a_no_op() {
    let seeded = seeded_plan(&[3]).await;
    let day = seeded.days[0];
    let b = seeded.entries[0][1];

    let change = assert_ok!(seeded.service().move_place_within(seeded.plan, day, b, 2, 2).await);
    assert_matches!(change, DayPlaceChange::UpdateInner { modified_index_order: 2, .. });
    assert_eq!(entry_ids(seeded.service(), seeded.plan, day).await, seeded.entries[0]);
}

#[tokio::test]
async fn test_cross_move_into_same_day_runs_as_inner_move() {
    let seeded = seeded_plan(&[3]).await;
    let day = seeded.days[0];
    let [a, b, c] = [seeded.entries[0][0], seeded.entries[0][1], seeded.entries[0][2]];

    let change = assert_ok!(
        seeded
            .service()
            .move_place_across(seeded.plan, day, a, day, 1, 3)
            .await
    );
    assert_matches!(change, DayPlaceChange::UpdateInner { .. });
    assert_eq!(entry_ids(seeded.service(), seeded.plan, day).await, vec![b, c, a]);
}

#[tokio::test]
async fn test_cross_move_to_end_of_target() {
    let seeded = seeded_plan(&[1, 2]).await;
    let [from, to] = [seeded.days[0], seeded.days[1]];
    let moved = seeded.entries[0][0];

    assert_ok!(
        seeded
            .service()
            .move_place_across(seeded.plan, from, moved, to, 1, 3)
            .await
    );
    assert!(entry_ids(seeded.service(), seeded.plan, from).await.is_empty());
    assert_eq!(
        entry_ids(seeded.service(), seeded.plan, to).await,
        vec![seeded.entries[1][0], seeded.entries[1][1], moved]
    );
}

#[tokio::test]
async fn test_cross_move_past_end_is_rejected() {
    let seeded = seeded_plan(&[1, 1]).await;
    let result = seeded
        .service()
        .move_place_across(seeded.plan, seeded.days[0], seeded.entries[0][0], seeded.days[1], 1, 3)
        .await;

    assert_err!(result, MutationError::InvalidPosition { .. });
    assert_eq!(entry_ids(seeded.service(), seeded.plan, seeded.days[0]).await.len(), 1);
    assert_eq!(entry_ids(seeded.service(), seeded.plan, seeded.days[1]).await.len(), 1);
}

#[tokio::test]
async fn test_delete_day_closes_gap_and_drops_entries() {
    let seeded = seeded_plan(&[1, 2, 1]).await;
    let middle = seeded.days[1];

    let change = assert_ok!(seeded.service().delete_day(seeded.plan, middle).await);
    assert_matches!(change, DayScheduleChange::Delete { ref order, .. } if order.len() == 2);
    assert_eq!(
        day_ids(seeded.service(), seeded.plan).await,
        vec![seeded.days[0], seeded.days[2]]
    );
    assert_err!(
        seeded.service().day_schedule(seeded.plan, middle).await,
        MutationError::NotFound { .. }
    );
}

#[tokio::test]
async fn test_delete_entry_closes_gap() {
    let seeded = seeded_plan(&[4]).await;
    let day = seeded.days[0];
    let removed = seeded.entries[0][1];

    assert_ok!(seeded.service().delete_place(seeded.plan, day, removed).await);
    let remaining: Vec<_> = seeded.entries[0].iter().copied().filter(|id| *id != removed).collect();
    assert_eq!(entry_ids(seeded.service(), seeded.plan, day).await, remaining);
}

#[tokio::test]
async fn test_entry_addressed_through_wrong_day_is_not_found() {
    let seeded = seeded_plan(&[1, 1]).await;
    let entry_of_first = seeded.entries[0][0];

    let result = seeded
        .service()
        .move_place_within(seeded.plan, seeded.days[1], entry_of_first, 1, 1)
        .await;
    assert_err!(result, MutationError::NotFound { .. });

    let result = seeded
        .service()
        .delete_place(seeded.plan, seeded.days[1], entry_of_first)
        .await;
    assert_err!(result, MutationError::NotFound { .. });
}

#[tokio::test]
async fn test_day_of_another_plan_is_not_found() {
    let seeded = seeded_plan(&[1]).await;
    let other = assert_ok!(seeded.service().create_plan("Busan", crate::common::OWNER).await);

    let result = seeded.service().move_day(other.plan_id, seeded.days[0], 1, 1).await;
    assert_err!(result, MutationError::NotFound { .. });
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let seeded = seeded_plan(&[1]).await;
    let result = seeded
        .service()
        .create_place(seeded.plan, seeded.days[0], PlaceId(987_654), None, None)
        .await;
    assert_err!(result, MutationError::NotFound { .. });

    let result = seeded.service().rename_day(seeded.plan, DayScheduleId(987_654), "Day X").await;
    assert_err!(result, MutationError::NotFound { .. });
}

#[tokio::test]
async fn test_insert_positions_are_bounded() {
    let seeded = seeded_plan(&[2]).await;
    let day = seeded.days[0];

    for position in [0, 4, -1] {
        let result = seeded
            .service()
            .create_place(seeded.plan, day, seeded.place, Some(position), None)
            .await;
        assert_err!(result, MutationError::InvalidPosition { .. });
    }
    assert_ok!(
        seeded
            .service()
            .create_place(seeded.plan, day, seeded.place, Some(3), None)
            .await
    );
    assert_eq!(entry_ids(seeded.service(), seeded.plan, day).await.len(), 3);
}

#[tokio::test]
async fn test_renames_validate_text() {
    let seeded = seeded_plan(&[1]).await;
    let day = seeded.days[0];
    let entry = seeded.entries[0][0];

    let change = assert_ok!(seeded.service().rename_day(seeded.plan, day, "  Arrival  ").await);
    assert_matches!(change, DayScheduleChange::Rename { ref title, .. } if title == "Arrival");

    let result = seeded.service().rename_day(seeded.plan, day, &"t".repeat(101)).await;
    assert_err!(result, MutationError::Validation(_));

    let change = assert_ok!(
        seeded
            .service()
            .rename_memo(seeded.plan, day, entry, Some("bring umbrella"))
            .await
    );
    assert_matches!(change, DayPlaceChange::Rename { memo: Some(ref memo), .. } if memo == "bring umbrella");

    let view = assert_ok!(seeded.service().day_schedule(seeded.plan, day).await);
    assert_eq!(view.title, "Arrival");
    assert_eq!(view.places[0].memo.as_deref(), Some("bring umbrella"));
}

#[tokio::test]
async fn test_plan_schedule_lists_empty_days() {
    let seeded = seeded_plan(&[0, 2]).await;
    let schedule = assert_ok!(seeded.service().plan_schedule(seeded.plan).await);

    assert_eq!(schedule.days.len(), 2);
    assert!(schedule.days[0].places.is_empty());
    assert_eq!(schedule.days[1].places.len(), 2);
    assert_eq!(schedule.days[1].places[0].place.place_name, "Gyeongbokgung");
}
