//! Itinerary Store
//!
//! Durable rows for plans, participants, places, days and entries, behind
//! one contract with two backends:
//!
//! - **`memory`** - `MemoryStore`, used when no database is configured and
//!   by the test suite
//! - **`postgres`** - `PgStore` over a sqlx `PgPool`, schema in `migrations/`
//!
//! # Units of Work
//!
//! Mutations run inside a `UnitOfWork` obtained from `ItineraryStore::begin`.
//! Nothing written through it is visible to anyone else until `commit`;
//! dropping it uncommitted discards every write. Reads inside a unit of work
//! observe committed state, so callers read positions before writing them.
//!
//! # Row Locks
//!
//! `UnitOfWork::lock_scopes` takes the database-side counterpart of the
//! in-process scope locks (`SELECT ... FOR NO KEY UPDATE` on the plan or day
//! row) in the same canonical order. The memory backend relies on the
//! in-process locks alone.

pub mod memory;
pub mod postgres;

use std::time::Duration;

use thiserror::Error;

use crate::backend::lock::ScopeId;
use crate::shared::itinerary::{
    DayPlaceId, DayScheduleId, DayScheduleView, NewPlace, ParticipantStatus, Place, PlaceId, Plan,
    PlanId, PlanSchedule, UserId,
};
use crate::shared::ordering::Position;

pub use memory::{MemoryStore, MemoryTx};
pub use postgres::{PgStore, PgTx};

/// SQLSTATE `lock_not_available`
const LOCK_NOT_AVAILABLE: &str = "55P03";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("timed out waiting for a row lock")]
    LockTimeout,

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let lock_timeout = err
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == LOCK_NOT_AVAILABLE);
        if lock_timeout {
            Self::LockTimeout
        } else {
            Self::Database(err)
        }
    }
}

/// Where a row was found relative to the scope the caller named
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    InScope,
    /// Exists, but under a different parent
    Elsewhere,
    Missing,
}

impl Containment {
    pub(crate) fn of<P: PartialEq>(parent: Option<P>, expected: P) -> Self {
        match parent {
            None => Self::Missing,
            Some(parent) if parent == expected => Self::InScope,
            Some(_) => Self::Elsewhere,
        }
    }
}

#[derive(Clone)]
pub enum ItineraryStore {
    Memory(MemoryStore),
    Postgres(PgStore),
}

impl ItineraryStore {
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self::Postgres(PgStore::new(pool))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }

    pub async fn begin(&self) -> Result<UnitOfWork, StoreError> {
        match self {
            Self::Memory(store) => Ok(UnitOfWork::Memory(store.begin())),
            Self::Postgres(store) => Ok(UnitOfWork::Postgres(store.begin().await?)),
        }
    }

    /// Create a plan whose owner is its first approved participant
    pub async fn create_plan(&self, title: &str, owner: UserId) -> Result<Plan, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.create_plan(title, owner).await),
            Self::Postgres(store) => store.create_plan(title, owner).await,
        }
    }

    pub async fn add_participant(
        &self,
        plan: PlanId,
        user: UserId,
        status: ParticipantStatus,
    ) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => {
                store.add_participant(plan, user, status).await;
                Ok(())
            }
            Self::Postgres(store) => store.add_participant(plan, user, status).await,
        }
    }

    pub async fn remove_participant(&self, plan: PlanId, user: UserId) -> Result<bool, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.remove_participant(plan, user).await),
            Self::Postgres(store) => store.remove_participant(plan, user).await,
        }
    }

    pub async fn plan_owner(&self, plan: PlanId) -> Result<Option<UserId>, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.plan_owner(plan).await),
            Self::Postgres(store) => store.plan_owner(plan).await,
        }
    }

    pub async fn add_place(&self, place: NewPlace) -> Result<Place, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.add_place(place).await),
            Self::Postgres(store) => store.add_place(place).await,
        }
    }

    pub async fn plan_exists(&self, plan: PlanId) -> Result<bool, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.plan_exists(plan).await),
            Self::Postgres(store) => store.plan_exists(plan).await,
        }
    }

    pub async fn participant_status(
        &self,
        plan: PlanId,
        user: UserId,
    ) -> Result<Option<ParticipantStatus>, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.participant_status(plan, user).await),
            Self::Postgres(store) => store.participant_status(plan, user).await,
        }
    }

    /// Full itinerary of a plan, read without scope locks
    pub async fn plan_schedule(&self, plan: PlanId) -> Result<Option<PlanSchedule>, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.plan_schedule(plan).await),
            Self::Postgres(store) => store.plan_schedule(plan).await,
        }
    }

    /// One day of a plan; `None` when the day does not belong to the plan
    pub async fn day_schedule(
        &self,
        plan: PlanId,
        day: DayScheduleId,
    ) -> Result<Option<DayScheduleView>, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.day_schedule(plan, day).await),
            Self::Postgres(store) => store.day_schedule(plan, day).await,
        }
    }
}

/// An open unit of work on either backend
pub enum UnitOfWork {
    Memory(MemoryTx),
    Postgres(PgTx),
}

macro_rules! dispatch {
    ($self:expr, $tx:ident => $call:expr) => {
        match $self {
            UnitOfWork::Memory($tx) => $call,
            UnitOfWork::Postgres($tx) => $call,
        }
    };
}

impl UnitOfWork {
    /// Take the storage-side locks for `scopes` in canonical order
    pub async fn lock_scopes(&mut self, scopes: &[ScopeId], timeout: Duration) -> Result<(), StoreError> {
        let mut ordered = scopes.to_vec();
        ordered.sort();
        ordered.dedup();
        dispatch!(self, tx => tx.lock_scopes(&ordered, timeout).await)
    }

    pub async fn plan_exists(&mut self, plan: PlanId) -> Result<bool, StoreError> {
        dispatch!(self, tx => tx.plan_exists(plan).await)
    }

    pub async fn locate_day(&mut self, plan: PlanId, day: DayScheduleId) -> Result<Containment, StoreError> {
        dispatch!(self, tx => tx.locate_day(plan, day).await)
    }

    pub async fn locate_entry(
        &mut self,
        day: DayScheduleId,
        entry: DayPlaceId,
    ) -> Result<Containment, StoreError> {
        dispatch!(self, tx => tx.locate_entry(day, entry).await)
    }

    pub async fn place_exists(&mut self, place: PlaceId) -> Result<bool, StoreError> {
        dispatch!(self, tx => tx.place_exists(place).await)
    }

    pub async fn day_orders(&mut self, plan: PlanId) -> Result<Vec<(DayScheduleId, Position)>, StoreError> {
        dispatch!(self, tx => tx.day_orders(plan).await)
    }

    pub async fn entry_orders(
        &mut self,
        day: DayScheduleId,
    ) -> Result<Vec<(DayPlaceId, Position)>, StoreError> {
        dispatch!(self, tx => tx.entry_orders(day).await)
    }

    pub async fn insert_day(
        &mut self,
        plan: PlanId,
        title: &str,
        position: Position,
    ) -> Result<DayScheduleId, StoreError> {
        dispatch!(self, tx => tx.insert_day(plan, title, position).await)
    }

    pub async fn rename_day(&mut self, day: DayScheduleId, title: &str) -> Result<(), StoreError> {
        dispatch!(self, tx => tx.rename_day(day, title).await)
    }

    pub async fn set_day_orders(&mut self, orders: &[(DayScheduleId, Position)]) -> Result<(), StoreError> {
        if orders.is_empty() {
            return Ok(());
        }
        dispatch!(self, tx => tx.set_day_orders(orders).await)
    }

    /// Delete a day together with all of its entries
    pub async fn delete_day(&mut self, day: DayScheduleId) -> Result<(), StoreError> {
        dispatch!(self, tx => tx.delete_day(day).await)
    }

    pub async fn insert_entry(
        &mut self,
        day: DayScheduleId,
        place: PlaceId,
        position: Position,
        memo: Option<&str>,
    ) -> Result<DayPlaceId, StoreError> {
        dispatch!(self, tx => tx.insert_entry(day, place, position, memo).await)
    }

    pub async fn set_memo(&mut self, entry: DayPlaceId, memo: Option<&str>) -> Result<(), StoreError> {
        dispatch!(self, tx => tx.set_memo(entry, memo).await)
    }

    pub async fn set_entry_orders(&mut self, orders: &[(DayPlaceId, Position)]) -> Result<(), StoreError> {
        if orders.is_empty() {
            return Ok(());
        }
        dispatch!(self, tx => tx.set_entry_orders(orders).await)
    }

    /// Move an entry under another day at `position`
    pub async fn reparent_entry(
        &mut self,
        entry: DayPlaceId,
        day: DayScheduleId,
        position: Position,
    ) -> Result<(), StoreError> {
        dispatch!(self, tx => tx.reparent_entry(entry, day, position).await)
    }

    pub async fn delete_entry(&mut self, entry: DayPlaceId) -> Result<(), StoreError> {
        dispatch!(self, tx => tx.delete_entry(entry).await)
    }

    /// Delete a plan with its participants, days and entries; places stay
    pub async fn delete_plan(&mut self, plan: PlanId) -> Result<(), StoreError> {
        dispatch!(self, tx => tx.delete_plan(plan).await)
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        dispatch!(self, tx => tx.commit().await)
    }
}
