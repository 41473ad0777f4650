/**
 * In-Memory Store
 *
 * Tables held in `Arc<tokio::sync::RwLock<..>>`. A unit of work stages its
 * writes and applies them in one step under the write lock at `commit`, so
 * readers never observe half of a mutation. Ids come from a single counter
 * shared by every table and are not reused after a rollback.
 */

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use super::{Containment, StoreError};
use crate::backend::lock::ScopeId;
use crate::shared::itinerary::{
    DayPlace, DayPlaceId, DayPlaceView, DaySchedule, DayScheduleId, DayScheduleView, NewPlace,
    ParticipantStatus, Place, PlaceId, Plan, PlanId, PlanSchedule, UserId,
};
use crate::shared::ordering::Position;

#[derive(Debug, Default)]
struct Tables {
    plans: BTreeMap<PlanId, Plan>,
    participants: HashMap<(PlanId, UserId), ParticipantStatus>,
    places: BTreeMap<PlaceId, Place>,
    days: BTreeMap<DayScheduleId, DaySchedule>,
    entries: BTreeMap<DayPlaceId, DayPlace>,
}

impl Tables {
    fn day_view(&self, day: &DaySchedule) -> DayScheduleView {
        let mut places: Vec<DayPlaceView> = self
            .entries
            .values()
            .filter(|entry| entry.day_schedule_id == day.day_schedule_id)
            .filter_map(|entry| {
                let place = self.places.get(&entry.place_id)?;
                Some(DayPlaceView {
                    day_place_id: entry.day_place_id,
                    index_order: entry.index_order,
                    memo: entry.memo.clone(),
                    place: place.clone(),
                })
            })
            .collect();
        places.sort_by_key(|entry| entry.index_order);

        DayScheduleView {
            day_schedule_id: day.day_schedule_id,
            day_order: day.day_order,
            title: day.title.clone(),
            places,
        }
    }
}

#[derive(Debug)]
enum Write {
    InsertDay(DaySchedule),
    RenameDay { day: DayScheduleId, title: String },
    SetDayOrder { day: DayScheduleId, position: Position },
    DeleteDay(DayScheduleId),
    InsertEntry(DayPlace),
    SetMemo { entry: DayPlaceId, memo: Option<String> },
    SetEntryOrder { entry: DayPlaceId, position: Position },
    Reparent { entry: DayPlaceId, day: DayScheduleId, position: Position },
    DeleteEntry(DayPlaceId),
    DeletePlan(PlanId),
}

impl Write {
    fn apply(self, tables: &mut Tables) {
        match self {
            Write::InsertDay(day) => {
                tables.days.insert(day.day_schedule_id, day);
            }
            Write::RenameDay { day, title } => {
                if let Some(row) = tables.days.get_mut(&day) {
                    row.title = title;
                }
            }
            Write::SetDayOrder { day, position } => {
                if let Some(row) = tables.days.get_mut(&day) {
                    row.day_order = position;
                }
            }
            Write::DeleteDay(day) => {
                tables.days.remove(&day);
                tables.entries.retain(|_, entry| entry.day_schedule_id != day);
            }
            Write::InsertEntry(entry) => {
                tables.entries.insert(entry.day_place_id, entry);
            }
            Write::SetMemo { entry, memo } => {
                if let Some(row) = tables.entries.get_mut(&entry) {
                    row.memo = memo;
                }
            }
            Write::SetEntryOrder { entry, position } => {
                if let Some(row) = tables.entries.get_mut(&entry) {
                    row.index_order = position;
                }
            }
            Write::Reparent { entry, day, position } => {
                if let Some(row) = tables.entries.get_mut(&entry) {
                    row.day_schedule_id = day;
                    row.index_order = position;
                }
            }
            Write::DeleteEntry(entry) => {
                tables.entries.remove(&entry);
            }
            Write::DeletePlan(plan) => {
                tables.plans.remove(&plan);
                tables.participants.retain(|(owner, _), _| *owner != plan);
                let days: Vec<DayScheduleId> = tables
                    .days
                    .values()
                    .filter(|row| row.plan_id == plan)
                    .map(|row| row.day_schedule_id)
                    .collect();
                for day in days {
                    tables.days.remove(&day);
                    tables.entries.retain(|_, entry| entry.day_schedule_id != day);
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    next_id: Arc<AtomicI64>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn allocate(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn begin(&self) -> MemoryTx {
        MemoryTx {
            store: self.clone(),
            writes: Vec::new(),
        }
    }

    pub async fn create_plan(&self, title: &str, owner: UserId) -> Plan {
        let plan = Plan {
            plan_id: PlanId(self.allocate()),
            title: title.to_string(),
            owner,
        };
        let mut tables = self.tables.write().await;
        tables.plans.insert(plan.plan_id, plan.clone());
        tables
            .participants
            .insert((plan.plan_id, owner), ParticipantStatus::Approved);
        plan
    }

    pub async fn add_participant(&self, plan: PlanId, user: UserId, status: ParticipantStatus) {
        self.tables.write().await.participants.insert((plan, user), status);
    }

    /// Returns whether a membership row was removed
    pub async fn remove_participant(&self, plan: PlanId, user: UserId) -> bool {
        self.tables.write().await.participants.remove(&(plan, user)).is_some()
    }

    pub async fn plan_owner(&self, plan: PlanId) -> Option<UserId> {
        self.tables.read().await.plans.get(&plan).map(|record| record.owner)
    }

    pub async fn add_place(&self, place: NewPlace) -> Place {
        let place = Place {
            place_id: PlaceId(self.allocate()),
            google_place_id: place.google_place_id,
            place_name: place.place_name,
            latitude: place.latitude,
            longitude: place.longitude,
            address: place.address,
        };
        self.tables.write().await.places.insert(place.place_id, place.clone());
        place
    }

    pub async fn plan_exists(&self, plan: PlanId) -> bool {
        self.tables.read().await.plans.contains_key(&plan)
    }

    pub async fn participant_status(&self, plan: PlanId, user: UserId) -> Option<ParticipantStatus> {
        self.tables.read().await.participants.get(&(plan, user)).copied()
    }

    pub async fn plan_schedule(&self, plan: PlanId) -> Option<PlanSchedule> {
        let tables = self.tables.read().await;
        let record = tables.plans.get(&plan)?;

        let mut days: Vec<&DaySchedule> = tables
            .days
            .values()
            .filter(|day| day.plan_id == plan)
            .collect();
        days.sort_by_key(|day| day.day_order);

        Some(PlanSchedule {
            plan_id: plan,
            title: record.title.clone(),
            days: days.into_iter().map(|day| tables.day_view(day)).collect(),
        })
    }

    pub async fn day_schedule(&self, plan: PlanId, day: DayScheduleId) -> Option<DayScheduleView> {
        let tables = self.tables.read().await;
        let row = tables.days.get(&day).filter(|row| row.plan_id == plan)?;
        Some(tables.day_view(row))
    }
}

/// Staged writes against a `MemoryStore`
pub struct MemoryTx {
    store: MemoryStore,
    writes: Vec<Write>,
}

impl MemoryTx {
    pub async fn lock_scopes(&mut self, _scopes: &[ScopeId], _timeout: Duration) -> Result<(), StoreError> {
        Ok(())
    }

    pub async fn plan_exists(&mut self, plan: PlanId) -> Result<bool, StoreError> {
        Ok(self.store.plan_exists(plan).await)
    }

    pub async fn locate_day(&mut self, plan: PlanId, day: DayScheduleId) -> Result<Containment, StoreError> {
        let tables = self.store.tables.read().await;
        Ok(Containment::of(tables.days.get(&day).map(|row| row.plan_id), plan))
    }

    pub async fn locate_entry(
        &mut self,
        day: DayScheduleId,
        entry: DayPlaceId,
    ) -> Result<Containment, StoreError> {
        let tables = self.store.tables.read().await;
        Ok(Containment::of(
            tables.entries.get(&entry).map(|row| row.day_schedule_id),
            day,
        ))
    }

    pub async fn place_exists(&mut self, place: PlaceId) -> Result<bool, StoreError> {
        Ok(self.store.tables.read().await.places.contains_key(&place))
    }

    pub async fn day_orders(&mut self, plan: PlanId) -> Result<Vec<(DayScheduleId, Position)>, StoreError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .days
            .values()
            .filter(|row| row.plan_id == plan)
            .map(|row| (row.day_schedule_id, row.day_order))
            .collect())
    }

    pub async fn entry_orders(&mut self, day: DayScheduleId) -> Result<Vec<(DayPlaceId, Position)>, StoreError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .entries
            .values()
            .filter(|row| row.day_schedule_id == day)
            .map(|row| (row.day_place_id, row.index_order))
            .collect())
    }

    pub async fn insert_day(
        &mut self,
        plan: PlanId,
        title: &str,
        position: Position,
    ) -> Result<DayScheduleId, StoreError> {
        let day_schedule_id = DayScheduleId(self.store.allocate());
        self.writes.push(Write::InsertDay(DaySchedule {
            day_schedule_id,
            plan_id: plan,
            day_order: position,
            title: title.to_string(),
        }));
        Ok(day_schedule_id)
    }

    pub async fn rename_day(&mut self, day: DayScheduleId, title: &str) -> Result<(), StoreError> {
        self.writes.push(Write::RenameDay {
            day,
            title: title.to_string(),
        });
        Ok(())
    }

    pub async fn set_day_orders(&mut self, orders: &[(DayScheduleId, Position)]) -> Result<(), StoreError> {
        self.writes.extend(
            orders
                .iter()
                .map(|(day, position)| Write::SetDayOrder {
                    day: *day,
                    position: *position,
                }),
        );
        Ok(())
    }

    pub async fn delete_day(&mut self, day: DayScheduleId) -> Result<(), StoreError> {
        self.writes.push(Write::DeleteDay(day));
        Ok(())
    }

    pub async fn insert_entry(
        &mut self,
        day: DayScheduleId,
        place: PlaceId,
        position: Position,
        memo: Option<&str>,
    ) -> Result<DayPlaceId, StoreError> {
        let day_place_id = DayPlaceId(self.store.allocate());
        self.writes.push(Write::InsertEntry(DayPlace {
            day_place_id,
            day_schedule_id: day,
            place_id: place,
            index_order: position,
            memo: memo.map(str::to_string),
        }));
        Ok(day_place_id)
    }

    pub async fn set_memo(&mut self, entry: DayPlaceId, memo: Option<&str>) -> Result<(), StoreError> {
        self.writes.push(Write::SetMemo {
            entry,
            memo: memo.map(str::to_string),
        });
        Ok(())
    }

    pub async fn set_entry_orders(&mut self, orders: &[(DayPlaceId, Position)]) -> Result<(), StoreError> {
        self.writes.extend(
            orders
                .iter()
                .map(|(entry, position)| Write::SetEntryOrder {
                    entry: *entry,
                    position: *position,
                }),
        );
        Ok(())
    }

    pub async fn reparent_entry(
        &mut self,
        entry: DayPlaceId,
        day: DayScheduleId,
        position: Position,
    ) -> Result<(), StoreError> {
        self.writes.push(Write::Reparent { entry, day, position });
        Ok(())
    }

    pub async fn delete_entry(&mut self, entry: DayPlaceId) -> Result<(), StoreError> {
        self.writes.push(Write::DeleteEntry(entry));
        Ok(())
    }

    /// Remove the plan with its participants, days and entries
    pub async fn delete_plan(&mut self, plan: PlanId) -> Result<(), StoreError> {
        self.writes.push(Write::DeletePlan(plan));
        Ok(())
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        let count = self.writes.len();
        let mut tables = self.store.tables.write().await;
        for write in self.writes {
            write.apply(&mut tables);
        }
        tracing::debug!(writes = count, "[Store] memory unit of work committed");
        Ok(())
    }
}
