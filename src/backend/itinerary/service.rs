/**
 * Itinerary Service
 *
 * Runs the reorder engine against stored days and entries. Every
 * position-changing operation follows the same sequence:
 *
 * 1. validate text input
 * 2. acquire the in-process scope locks (canonical order)
 * 3. open a unit of work and take the matching row locks
 * 4. check that every id really lives in the scope it was addressed through
 * 5. load the scope(s) into `PositionedList`s
 * 6. run the engine operation
 * 7. write the changed rows and commit
 *
 * The scope guard is dropped only after the commit returns, and any error
 * along the way drops the unit of work uncommitted.
 *
 * Renames touch no positions but still hold the day's entry scope, so they
 * queue behind a delete of the same day instead of racing it. Deleting a
 * plan holds its day scope and the entry scope of every one of its days.
 */

use std::time::Duration;

use crate::backend::lock::{ScopeGuard, ScopeId, ScopeLocks};
use crate::backend::store::{Containment, ItineraryStore, UnitOfWork};
use crate::shared::itinerary::{
    normalize_memo, normalize_title, DayPlaceChange, DayPlaceId, DayScheduleChange, DayScheduleId,
    DayScheduleView, NewPlace, Place, PlaceId, Plan, PlanChange, PlanId, PlanSchedule, UserId,
};
use crate::shared::ordering::{move_across, Position, PositionedList};
use crate::shared::SharedError;

use super::result::{MutationError, MutationResult};

type DayList = PositionedList<PlanId, DayScheduleId>;
type EntryList = PositionedList<DayScheduleId, DayPlaceId>;

/// Rounds `delete_plan` allows for days created between listing and locking
const DELETE_PLAN_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct ItineraryService {
    store: ItineraryStore,
    locks: ScopeLocks,
    lock_timeout: Duration,
}

impl ItineraryService {
    pub fn new(store: ItineraryStore, locks: ScopeLocks, lock_timeout: Duration) -> Self {
        Self {
            store,
            locks,
            lock_timeout,
        }
    }

    pub fn store(&self) -> &ItineraryStore {
        &self.store
    }

    pub fn locks(&self) -> &ScopeLocks {
        &self.locks
    }

    // ----- plans and places -------------------------------------------------

    pub async fn create_plan(&self, title: &str, owner: UserId) -> MutationResult<Plan> {
        let title = normalize_title(title)?;
        let plan = self.store.create_plan(&title, owner).await?;
        tracing::info!(plan = %plan.plan_id, %owner, "[Plan] created");
        Ok(plan)
    }

    pub async fn register_place(&self, mut place: NewPlace) -> MutationResult<Place> {
        place.place_name = place.place_name.trim().to_string();
        if place.place_name.is_empty() {
            return Err(SharedError::validation("place_name", "must not be empty").into());
        }
        if !(-90.0..=90.0).contains(&place.latitude) || !(-180.0..=180.0).contains(&place.longitude) {
            return Err(SharedError::validation("coordinates", "latitude or longitude out of range").into());
        }
        let place = self.store.add_place(place).await?;
        tracing::debug!(place = %place.place_id, name = %place.place_name, "[Place] registered");
        Ok(place)
    }

    /// Delete a plan with its participants, days and entries
    ///
    /// Places are shared and stay. The day list is read before locking, so a
    /// day created in between sends the operation round again with the wider
    /// lock set.
    pub async fn delete_plan(&self, plan: PlanId) -> MutationResult<PlanChange> {
        for attempt in 1..=DELETE_PLAN_ATTEMPTS {
            let known = {
                let mut peek = self.store.begin().await?;
                peek.day_orders(plan).await?
            };
            let mut scopes = vec![ScopeId::PlanDays(plan)];
            scopes.extend(known.iter().map(|(day, _)| ScopeId::DayPlaces(*day)));

            let (_guard, mut tx) = self.begin(&scopes).await?;
            if !tx.plan_exists(plan).await? {
                return Err(MutationError::not_found(plan));
            }
            let days = load_days(&mut tx, plan).await?;
            if days.keys().any(|day| !scopes.contains(&ScopeId::DayPlaces(*day))) {
                tracing::debug!(%plan, attempt, "[Plan] day list changed before locking, retrying");
                continue;
            }

            let day_schedule_ids: Vec<DayScheduleId> = days.keys().copied().collect();
            tx.delete_plan(plan).await?;
            tx.commit().await?;

            tracing::info!(%plan, days = day_schedule_ids.len(), "[Plan] deleted");
            return Ok(PlanChange::Delete {
                plan_id: plan,
                day_schedule_ids,
            });
        }

        tracing::warn!(%plan, "[Plan] day list kept changing, giving up on delete");
        Err(MutationError::Conflict {
            detail: format!("days of {plan} kept changing while it was being deleted"),
        })
    }

    // ----- reads ------------------------------------------------------------

    pub async fn plan_schedule(&self, plan: PlanId) -> MutationResult<PlanSchedule> {
        self.store
            .plan_schedule(plan)
            .await?
            .ok_or_else(|| MutationError::not_found(plan))
    }

    pub async fn day_schedule(&self, plan: PlanId, day: DayScheduleId) -> MutationResult<DayScheduleView> {
        self.store
            .day_schedule(plan, day)
            .await?
            .ok_or_else(|| MutationError::not_found(day))
    }

    // ----- days -------------------------------------------------------------

    /// Append a day to the plan
    pub async fn create_day(&self, plan: PlanId, title: &str) -> MutationResult<DayScheduleChange> {
        let title = normalize_title(title)?;
        let (_guard, mut tx) = self.begin(&[ScopeId::PlanDays(plan)]).await?;

        if !tx.plan_exists(plan).await? {
            return Err(MutationError::not_found(plan));
        }
        let mut days = load_days(&mut tx, plan).await?;

        let day_schedule_id = tx.insert_day(plan, &title, days.next_position()).await?;
        let outcome = days.append(day_schedule_id)?;
        tx.commit().await?;

        tracing::info!(%plan, day = %day_schedule_id, day_order = outcome.position, "[Schedule] day created");
        Ok(DayScheduleChange::Create {
            day_schedule_id,
            title,
            day_order: outcome.position,
            order: days.entries(),
        })
    }

    pub async fn rename_day(
        &self,
        plan: PlanId,
        day: DayScheduleId,
        title: &str,
    ) -> MutationResult<DayScheduleChange> {
        let title = normalize_title(title)?;
        let (_guard, mut tx) = self.begin(&[ScopeId::DayPlaces(day)]).await?;
        require(tx.locate_day(plan, day).await?, day, plan)?;
        tx.rename_day(day, &title).await?;
        tx.commit().await?;

        tracing::info!(%plan, %day, "[Schedule] day renamed");
        Ok(DayScheduleChange::Rename {
            day_schedule_id: day,
            title,
        })
    }

    /// Move a day from `expected` to `new_position` within its plan
    pub async fn move_day(
        &self,
        plan: PlanId,
        day: DayScheduleId,
        expected: Position,
        new_position: Position,
    ) -> MutationResult<DayScheduleChange> {
        let (_guard, mut tx) = self.begin(&[ScopeId::PlanDays(plan)]).await?;
        require(tx.locate_day(plan, day).await?, day, plan)?;

        let mut days = load_days(&mut tx, plan).await?;
        let outcome = days.move_within(&day, expected, new_position).inspect_err(|err| {
            tracing::info!(%plan, %day, expected, new_position, %err, "[Schedule] move rejected");
        })?;

        if !outcome.shifted.is_empty() {
            let mut writes = outcome.assignments();
            writes.push((day, outcome.position));
            tx.set_day_orders(&writes).await?;
        }
        tx.commit().await?;

        tracing::info!(
            %plan,
            %day,
            from = expected,
            to = outcome.position,
            shifted = outcome.shifted.len(),
            "[Schedule] day moved"
        );
        Ok(DayScheduleChange::UpdateSchedule {
            day_schedule_id: day,
            day_order: expected,
            modified_day_order: outcome.position,
            order: days.entries(),
        })
    }

    /// Delete a day with all of its entries and close the gap it leaves
    pub async fn delete_day(&self, plan: PlanId, day: DayScheduleId) -> MutationResult<DayScheduleChange> {
        let (_guard, mut tx) = self
            .begin(&[ScopeId::PlanDays(plan), ScopeId::DayPlaces(day)])
            .await?;
        require(tx.locate_day(plan, day).await?, day, plan)?;

        let mut days = load_days(&mut tx, plan).await?;
        let outcome = days.remove(&day)?;

        tx.delete_day(day).await?;
        tx.set_day_orders(&outcome.assignments()).await?;
        tx.commit().await?;

        tracing::info!(%plan, %day, vacated = outcome.position, "[Schedule] day deleted");
        Ok(DayScheduleChange::Delete {
            day_schedule_id: day,
            order: days.entries(),
        })
    }

    // ----- entries ----------------------------------------------------------

    /// Add an entry to a day, at `position` or at the end when `None`
    pub async fn create_place(
        &self,
        plan: PlanId,
        day: DayScheduleId,
        place: PlaceId,
        position: Option<Position>,
        memo: Option<&str>,
    ) -> MutationResult<DayPlaceChange> {
        let memo = normalize_memo(memo)?;
        let (_guard, mut tx) = self.begin(&[ScopeId::DayPlaces(day)]).await?;
        require(tx.locate_day(plan, day).await?, day, plan)?;
        if !tx.place_exists(place).await? {
            return Err(MutationError::not_found(place));
        }

        let mut entries = load_entries(&mut tx, day).await?;
        let position = position.unwrap_or_else(|| entries.next_position());
        entries.validate_insert(position)?;

        let day_place_id = tx.insert_entry(day, place, position, memo.as_deref()).await?;
        let outcome = entries.insert_at(day_place_id, position)?;
        tx.set_entry_orders(&outcome.assignments()).await?;
        tx.commit().await?;

        tracing::info!(%plan, %day, entry = %day_place_id, index_order = position, "[Place] entry created");
        Ok(DayPlaceChange::Create {
            day_schedule_id: day,
            day_place_id,
            place_id: place,
            index_order: position,
            memo,
            order: entries.entries(),
        })
    }

    pub async fn rename_memo(
        &self,
        plan: PlanId,
        day: DayScheduleId,
        entry: DayPlaceId,
        memo: Option<&str>,
    ) -> MutationResult<DayPlaceChange> {
        let memo = normalize_memo(memo)?;
        let (_guard, mut tx) = self.begin(&[ScopeId::DayPlaces(day)]).await?;
        require(tx.locate_day(plan, day).await?, day, plan)?;
        require(tx.locate_entry(day, entry).await?, entry, day)?;
        tx.set_memo(entry, memo.as_deref()).await?;
        tx.commit().await?;

        tracing::info!(%plan, %day, %entry, "[Place] memo updated");
        Ok(DayPlaceChange::Rename {
            day_schedule_id: day,
            day_place_id: entry,
            memo,
        })
    }

    /// Move an entry from `expected` to `new_position` within its day
    pub async fn move_place_within(
        &self,
        plan: PlanId,
        day: DayScheduleId,
        entry: DayPlaceId,
        expected: Position,
        new_position: Position,
    ) -> MutationResult<DayPlaceChange> {
        let (_guard, mut tx) = self.begin(&[ScopeId::DayPlaces(day)]).await?;
        require(tx.locate_day(plan, day).await?, day, plan)?;
        require(tx.locate_entry(day, entry).await?, entry, day)?;

        let mut entries = load_entries(&mut tx, day).await?;
        let outcome = entries.move_within(&entry, expected, new_position).inspect_err(|err| {
            tracing::info!(%plan, %day, %entry, expected, new_position, %err, "[Place] move rejected");
        })?;

        if !outcome.shifted.is_empty() {
            let mut writes = outcome.assignments();
            writes.push((entry, outcome.position));
            tx.set_entry_orders(&writes).await?;
        }
        tx.commit().await?;

        tracing::info!(%plan, %day, %entry, from = expected, to = outcome.position, "[Place] entry moved");
        Ok(DayPlaceChange::UpdateInner {
            day_schedule_id: day,
            day_place_id: entry,
            index_order: expected,
            modified_index_order: outcome.position,
            order: entries.entries(),
        })
    }

    /// Move an entry out of `from_day` into `to_day` at `new_position`
    ///
    /// When both days are the same this is an ordinary move within the day.
    pub async fn move_place_across(
        &self,
        plan: PlanId,
        from_day: DayScheduleId,
        entry: DayPlaceId,
        to_day: DayScheduleId,
        expected: Position,
        new_position: Position,
    ) -> MutationResult<DayPlaceChange> {
        if from_day == to_day {
            return self
                .move_place_within(plan, from_day, entry, expected, new_position)
                .await;
        }

        let (_guard, mut tx) = self
            .begin(&[ScopeId::DayPlaces(from_day), ScopeId::DayPlaces(to_day)])
            .await?;
        require(tx.locate_day(plan, from_day).await?, from_day, plan)?;
        require(tx.locate_day(plan, to_day).await?, to_day, plan)?;
        require(tx.locate_entry(from_day, entry).await?, entry, from_day)?;

        let mut source = load_entries(&mut tx, from_day).await?;
        let mut target = load_entries(&mut tx, to_day).await?;
        let moved = move_across(&mut source, &mut target, &entry, expected, new_position).inspect_err(|err| {
            tracing::info!(%plan, %from_day, %to_day, %entry, expected, new_position, %err, "[Place] transfer rejected");
        })?;

        let closing: Vec<_> = moved.source.iter().map(|shift| (shift.id, shift.to)).collect();
        let opening: Vec<_> = moved.target.iter().map(|shift| (shift.id, shift.to)).collect();
        tx.set_entry_orders(&closing).await?;
        tx.set_entry_orders(&opening).await?;
        tx.reparent_entry(entry, to_day, moved.position).await?;
        tx.commit().await?;

        tracing::info!(
            %plan,
            %entry,
            %from_day,
            %to_day,
            from = moved.previous,
            to = moved.position,
            "[Place] entry moved across days"
        );
        Ok(DayPlaceChange::UpdateOuter {
            day_place_id: entry,
            day_schedule_id: from_day,
            modified_day_schedule_id: to_day,
            index_order: moved.previous,
            modified_index_order: moved.position,
            source_order: source.entries(),
            target_order: target.entries(),
        })
    }

    pub async fn delete_place(
        &self,
        plan: PlanId,
        day: DayScheduleId,
        entry: DayPlaceId,
    ) -> MutationResult<DayPlaceChange> {
        let (_guard, mut tx) = self.begin(&[ScopeId::DayPlaces(day)]).await?;
        require(tx.locate_day(plan, day).await?, day, plan)?;
        require(tx.locate_entry(day, entry).await?, entry, day)?;

        let mut entries = load_entries(&mut tx, day).await?;
        let outcome = entries.remove(&entry)?;

        tx.delete_entry(entry).await?;
        tx.set_entry_orders(&outcome.assignments()).await?;
        tx.commit().await?;

        tracing::info!(%plan, %day, %entry, vacated = outcome.position, "[Place] entry deleted");
        Ok(DayPlaceChange::Delete {
            day_schedule_id: day,
            day_place_id: entry,
            order: entries.entries(),
        })
    }

    /// Lock `scopes` in-process, then open a unit of work holding their row locks
    async fn begin(&self, scopes: &[ScopeId]) -> MutationResult<(ScopeGuard, UnitOfWork)> {
        let guard = self.locks.acquire(scopes.iter().copied(), self.lock_timeout).await?;
        let mut tx = self.store.begin().await?;
        tx.lock_scopes(scopes, self.lock_timeout).await?;
        Ok((guard, tx))
    }
}

/// Turn a containment check into `NotFound` unless the row is in scope
fn require(
    containment: Containment,
    item: impl std::fmt::Display,
    scope: impl std::fmt::Display,
) -> MutationResult<()> {
    match containment {
        Containment::InScope => Ok(()),
        Containment::Elsewhere => {
            tracing::warn!(%item, %scope, "[Schedule] addressed through a scope it does not belong to");
            Err(MutationError::not_found(format!("{item} in {scope}")))
        }
        Containment::Missing => Err(MutationError::not_found(item)),
    }
}

async fn load_days(tx: &mut UnitOfWork, plan: PlanId) -> MutationResult<DayList> {
    let rows = tx.day_orders(plan).await?;
    let days = PositionedList::from_positions(plan, rows).inspect_err(|err| {
        tracing::error!(%plan, %err, "[Schedule] stored day order is inconsistent");
    })?;
    Ok(days)
}

async fn load_entries(tx: &mut UnitOfWork, day: DayScheduleId) -> MutationResult<EntryList> {
    let rows = tx.entry_orders(day).await?;
    let entries = PositionedList::from_positions(day, rows).inspect_err(|err| {
        tracing::error!(%day, %err, "[Place] stored entry order is inconsistent");
    })?;
    Ok(entries)
}
