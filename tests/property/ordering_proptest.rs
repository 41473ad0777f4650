//! Property tests for `PositionedList`
//!
//! A plain `Vec` serves as the model: after every operation the list must
//! hold the same members in the same order, numbered `1..=n`.

use proptest::prelude::*;

use tripboard::shared::ordering::{move_across, OrderingError, Position, PositionedList};

type List = PositionedList<&'static str, u32>;

#[derive(Debug, Clone)]
enum Op {
    Append,
    Insert(usize),
    Move { pick: usize, target: usize },
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Append),
        (0usize..16).prop_map(Op::Insert),
        (0usize..16, 0usize..16).prop_map(|(pick, target)| Op::Move { pick, target }),
        (0usize..16).prop_map(Op::Remove),
    ]
}

fn list_of(scope: &'static str, items: &[u32]) -> List {
    PositionedList::from_positions(
        scope,
        items.iter().enumerate().map(|(i, item)| (*item, i as Position + 1)),
    )
    .unwrap()
}

fn members(list: &List) -> Vec<u32> {
    list.keys().copied().collect()
}

fn positions(list: &List) -> Vec<Position> {
    list.entries().into_iter().map(|entry| entry.position).collect()
}

proptest! {
    #[test]
    fn prop_operations_keep_positions_dense(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut list = List::new("day");
        let mut model: Vec<u32> = Vec::new();
        let mut next_id = 0u32;

        for op in ops {
            match op {
                Op::Append => {
                    list.append(next_id).unwrap();
                    model.push(next_id);
                    next_id += 1;
                }
                Op::Insert(slot) => {
                    let index = slot % (model.len() + 1);
                    list.insert_at(next_id, index as Position + 1).unwrap();
                    model.insert(index, next_id);
                    next_id += 1;
                }
                Op::Move { pick, target } if !model.is_empty() => {
                    let from = pick % model.len();
                    let to = target % model.len();
                    let item = model[from];
                    list.move_within(&item, from as Position + 1, to as Position + 1).unwrap();
                    let moved = model.remove(from);
                    model.insert(to, moved);
                }
                Op::Remove(pick) if !model.is_empty() => {
                    let item = model.remove(pick % model.len());
                    list.remove(&item).unwrap();
                }
                _ => {}
            }

            prop_assert_eq!(members(&list), model.clone());
            let expected: Vec<Position> = (1..=model.len() as Position).collect();
            prop_assert_eq!(positions(&list), expected);
        }
    }

    #[test]
    fn prop_shifts_describe_the_new_order(len in 1usize..20, pick in 0usize..20, target in 0usize..20) {
        let items: Vec<u32> = (0..len as u32).collect();
        let mut list = list_of("day", &items);
        let from = pick % len;
        let to = target % len;

        let outcome = list.move_within(&items[from], from as Position + 1, to as Position + 1).unwrap();

        prop_assert_eq!(outcome.position, to as Position + 1);
        for shift in &outcome.shifted {
            prop_assert_eq!(list.position_of(&shift.id), Some(shift.to));
            prop_assert_eq!((shift.from - shift.to).abs(), 1);
        }
        prop_assert_eq!(outcome.shifted.len(), from.abs_diff(to));
    }

    #[test]
    fn prop_move_to_own_position_changes_nothing(len in 1usize..20, pick in 0usize..20) {
        let items: Vec<u32> = (0..len as u32).collect();
        let mut list = list_of("day", &items);
        let position = (pick % len) as Position + 1;

        let outcome = list.move_within(&items[pick % len], position, position).unwrap();

        prop_assert!(outcome.shifted.is_empty());
        prop_assert_eq!(members(&list), items);
    }

    #[test]
    fn prop_stale_or_out_of_range_moves_leave_list_untouched(
        len in 2usize..20,
        pick in 0usize..20,
        offset in 1usize..20,
        beyond in 1i32..10,
    ) {
        let items: Vec<u32> = (0..len as u32).collect();
        let mut list = list_of("day", &items);
        let actual = (pick % len) as Position + 1;
        let stale = ((pick + offset % (len - 1) + 1) % len) as Position + 1;
        prop_assume!(stale != actual);

        let result = list.move_within(&items[pick % len], stale, 1);
        let is_conflict = matches!(result, Err(OrderingError::Conflict { .. }));
        prop_assert!(is_conflict);
        prop_assert_eq!(members(&list), items.clone());

        let result = list.move_within(&items[pick % len], actual, len as Position + beyond);
        let is_invalid = matches!(result, Err(OrderingError::InvalidPosition { .. }));
        prop_assert!(is_invalid);
        prop_assert_eq!(members(&list), items);
    }

    #[test]
    fn prop_insert_then_remove_restores_list(len in 0usize..20, slot in 0usize..21) {
        let items: Vec<u32> = (0..len as u32).collect();
        let mut list = list_of("day", &items);
        let position = (slot % (len + 1)) as Position + 1;

        list.insert_at(999, position).unwrap();
        prop_assert_eq!(list.position_of(&999), Some(position));
        let removed = list.remove(&999).unwrap();

        prop_assert_eq!(removed.position, position);
        prop_assert_eq!(members(&list), items);
    }

    #[test]
    fn prop_move_across_conserves_members(
        source_len in 1usize..15,
        target_len in 0usize..15,
        pick in 0usize..15,
        slot in 0usize..16,
    ) {
        let source_items: Vec<u32> = (0..source_len as u32).collect();
        let target_items: Vec<u32> = (100..100 + target_len as u32).collect();
        let mut source = list_of("source", &source_items);
        let mut target = list_of("target", &target_items);
        let item = source_items[pick % source_len];
        let new_position = (slot % (target_len + 1)) as Position + 1;

        let moved = move_across(
            &mut source,
            &mut target,
            &item,
            (pick % source_len) as Position + 1,
            new_position,
        )
        .unwrap();

        prop_assert_eq!(moved.position, new_position);
        prop_assert_eq!(source.len() + target.len(), source_len + target_len);
        prop_assert!(!source.contains(&item));
        prop_assert_eq!(target.position_of(&item), Some(new_position));
        prop_assert_eq!(positions(&source), (1..=source.len() as Position).collect::<Vec<_>>());
        prop_assert_eq!(positions(&target), (1..=target.len() as Position).collect::<Vec<_>>());
    }

    #[test]
    fn prop_move_across_past_end_changes_neither_list(
        source_len in 1usize..10,
        target_len in 0usize..10,
        beyond in 2i32..10,
    ) {
        let source_items: Vec<u32> = (0..source_len as u32).collect();
        let target_items: Vec<u32> = (100..100 + target_len as u32).collect();
        let mut source = list_of("source", &source_items);
        let mut target = list_of("target", &target_items);

        let result = move_across(
            &mut source,
            &mut target,
            &source_items[0],
            1,
            target_len as Position + beyond,
        );

        let is_invalid = matches!(result, Err(OrderingError::InvalidPosition { .. }));
        prop_assert!(is_invalid);
        prop_assert_eq!(members(&source), source_items);
        prop_assert_eq!(members(&target), target_items);
    }
}
