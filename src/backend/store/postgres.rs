/**
 * PostgreSQL Store
 *
 * sqlx implementation of the itinerary store. A unit of work is one
 * database transaction; position uniqueness is enforced by deferred
 * `UNIQUE (parent, position)` constraints, so the intermediate states of a
 * renumbering inside a transaction are allowed while the committed state is
 * always checked.
 */

use std::time::Duration;

use sqlx::{PgPool, Postgres, Transaction};

use super::{Containment, StoreError};
use crate::backend::lock::ScopeId;
use crate::shared::itinerary::{
    DayPlaceId, DayPlaceView, DayScheduleId, DayScheduleView, NewPlace, ParticipantStatus, Place,
    PlaceId, Plan, PlanId, PlanSchedule, UserId,
};
use crate::shared::ordering::Position;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct DayRow {
    day_schedule_id: DayScheduleId,
    day_order: Position,
    title: String,
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    day_place_id: DayPlaceId,
    day_schedule_id: DayScheduleId,
    index_order: Position,
    memo: Option<String>,
    place_id: PlaceId,
    google_place_id: String,
    place_name: String,
    latitude: f64,
    longitude: f64,
    address: Option<String>,
}

impl EntryRow {
    fn into_view(self) -> DayPlaceView {
        DayPlaceView {
            day_place_id: self.day_place_id,
            index_order: self.index_order,
            memo: self.memo,
            place: Place {
                place_id: self.place_id,
                google_place_id: self.google_place_id,
                place_name: self.place_name,
                latitude: self.latitude,
                longitude: self.longitude,
                address: self.address,
            },
        }
    }
}

const ENTRY_VIEW_SELECT: &str = "\
    SELECT dp.day_place_id, dp.day_schedule_id, dp.index_order, dp.memo, \
           p.place_id, p.google_place_id, p.place_name, p.latitude, p.longitude, p.address \
    FROM day_places dp \
    JOIN places p ON p.place_id = dp.place_id \
    JOIN day_schedules ds ON ds.day_schedule_id = dp.day_schedule_id";

fn assemble(days: Vec<DayRow>, entries: Vec<EntryRow>) -> Vec<DayScheduleView> {
    let mut views: Vec<DayScheduleView> = days
        .into_iter()
        .map(|day| DayScheduleView {
            day_schedule_id: day.day_schedule_id,
            day_order: day.day_order,
            title: day.title,
            places: Vec::new(),
        })
        .collect();

    for entry in entries {
        if let Some(view) = views
            .iter_mut()
            .find(|view| view.day_schedule_id == entry.day_schedule_id)
        {
            view.places.push(entry.into_view());
        }
    }
    views
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<PgTx, StoreError> {
        Ok(PgTx {
            tx: self.pool.begin().await?,
        })
    }

    pub async fn create_plan(&self, title: &str, owner: UserId) -> Result<Plan, StoreError> {
        let mut tx = self.pool.begin().await?;
        let plan_id: PlanId =
            sqlx::query_scalar("INSERT INTO plans (title, owner_id) VALUES ($1, $2) RETURNING plan_id")
                .bind(title)
                .bind(owner)
                .fetch_one(&mut *tx)
                .await?;
        sqlx::query("INSERT INTO plan_participants (plan_id, user_id, status) VALUES ($1, $2, $3)")
            .bind(plan_id)
            .bind(owner)
            .bind(ParticipantStatus::Approved.as_str())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Plan {
            plan_id,
            title: title.to_string(),
            owner,
        })
    }

    pub async fn add_participant(
        &self,
        plan: PlanId,
        user: UserId,
        status: ParticipantStatus,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO plan_participants (plan_id, user_id, status) VALUES ($1, $2, $3) \
             ON CONFLICT (plan_id, user_id) DO UPDATE SET status = EXCLUDED.status",
        )
        .bind(plan)
        .bind(user)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove_participant(&self, plan: PlanId, user: UserId) -> Result<bool, StoreError> {
        let removed = sqlx::query("DELETE FROM plan_participants WHERE plan_id = $1 AND user_id = $2")
            .bind(plan)
            .bind(user)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(removed > 0)
    }

    pub async fn plan_owner(&self, plan: PlanId) -> Result<Option<UserId>, StoreError> {
        let owner = sqlx::query_scalar("SELECT owner_id FROM plans WHERE plan_id = $1")
            .bind(plan)
            .fetch_optional(&self.pool)
            .await?;
        Ok(owner)
    }

    pub async fn add_place(&self, place: NewPlace) -> Result<Place, StoreError> {
        let place_id: PlaceId = sqlx::query_scalar(
            "INSERT INTO places (google_place_id, place_name, latitude, longitude, address) \
             VALUES ($1, $2, $3, $4, $5) RETURNING place_id",
        )
        .bind(&place.google_place_id)
        .bind(&place.place_name)
        .bind(place.latitude)
        .bind(place.longitude)
        .bind(&place.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(Place {
            place_id,
            google_place_id: place.google_place_id,
            place_name: place.place_name,
            latitude: place.latitude,
            longitude: place.longitude,
            address: place.address,
        })
    }

    pub async fn plan_exists(&self, plan: PlanId) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM plans WHERE plan_id = $1)")
            .bind(plan)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn participant_status(
        &self,
        plan: PlanId,
        user: UserId,
    ) -> Result<Option<ParticipantStatus>, StoreError> {
        let status: Option<String> = sqlx::query_scalar(
            "SELECT status FROM plan_participants WHERE plan_id = $1 AND user_id = $2",
        )
        .bind(plan)
        .bind(user)
        .fetch_optional(&self.pool)
        .await?;

        Ok(status.as_deref().and_then(ParticipantStatus::parse))
    }

    pub async fn plan_schedule(&self, plan: PlanId) -> Result<Option<PlanSchedule>, StoreError> {
        let title: Option<String> = sqlx::query_scalar("SELECT title FROM plans WHERE plan_id = $1")
            .bind(plan)
            .fetch_optional(&self.pool)
            .await?;
        let Some(title) = title else {
            return Ok(None);
        };

        let days: Vec<DayRow> = sqlx::query_as(
            "SELECT day_schedule_id, day_order, title FROM day_schedules \
             WHERE plan_id = $1 ORDER BY day_order",
        )
        .bind(plan)
        .fetch_all(&self.pool)
        .await?;

        let entries: Vec<EntryRow> = sqlx::query_as(&format!(
            "{ENTRY_VIEW_SELECT} WHERE ds.plan_id = $1 ORDER BY dp.day_schedule_id, dp.index_order"
        ))
        .bind(plan)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(PlanSchedule {
            plan_id: plan,
            title,
            days: assemble(days, entries),
        }))
    }

    pub async fn day_schedule(
        &self,
        plan: PlanId,
        day: DayScheduleId,
    ) -> Result<Option<DayScheduleView>, StoreError> {
        let days: Vec<DayRow> = sqlx::query_as(
            "SELECT day_schedule_id, day_order, title FROM day_schedules \
             WHERE plan_id = $1 AND day_schedule_id = $2",
        )
        .bind(plan)
        .bind(day)
        .fetch_all(&self.pool)
        .await?;
        if days.is_empty() {
            return Ok(None);
        }

        let entries: Vec<EntryRow> = sqlx::query_as(&format!(
            "{ENTRY_VIEW_SELECT} WHERE ds.plan_id = $1 AND dp.day_schedule_id = $2 ORDER BY dp.index_order"
        ))
        .bind(plan)
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(assemble(days, entries).into_iter().next())
    }
}

/// One PostgreSQL transaction; rolled back if dropped before `commit`
pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

impl PgTx {
    /// Row-lock the plan or day row behind each scope, in the given order
    pub async fn lock_scopes(&mut self, scopes: &[ScopeId], timeout: Duration) -> Result<(), StoreError> {
        // SET cannot take bind parameters; the value is an integer we produced.
        let millis = timeout.as_millis().max(1);
        sqlx::query(&format!("SET LOCAL lock_timeout = '{millis}ms'"))
            .execute(&mut *self.tx)
            .await?;

        for scope in scopes {
            let query = match scope {
                ScopeId::PlanDays(plan) => {
                    sqlx::query("SELECT 1 FROM plans WHERE plan_id = $1 FOR NO KEY UPDATE").bind(*plan)
                }
                ScopeId::DayPlaces(day) => sqlx::query(
                    "SELECT 1 FROM day_schedules WHERE day_schedule_id = $1 FOR NO KEY UPDATE",
                )
                .bind(*day),
            };
            query.fetch_optional(&mut *self.tx).await?;
        }
        Ok(())
    }

    pub async fn plan_exists(&mut self, plan: PlanId) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM plans WHERE plan_id = $1)")
            .bind(plan)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(exists)
    }

    pub async fn locate_day(&mut self, plan: PlanId, day: DayScheduleId) -> Result<Containment, StoreError> {
        let parent: Option<PlanId> =
            sqlx::query_scalar("SELECT plan_id FROM day_schedules WHERE day_schedule_id = $1")
                .bind(day)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(Containment::of(parent, plan))
    }

    pub async fn locate_entry(
        &mut self,
        day: DayScheduleId,
        entry: DayPlaceId,
    ) -> Result<Containment, StoreError> {
        let parent: Option<DayScheduleId> =
            sqlx::query_scalar("SELECT day_schedule_id FROM day_places WHERE day_place_id = $1")
                .bind(entry)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(Containment::of(parent, day))
    }

    pub async fn place_exists(&mut self, place: PlaceId) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM places WHERE place_id = $1)")
            .bind(place)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(exists)
    }

    pub async fn day_orders(&mut self, plan: PlanId) -> Result<Vec<(DayScheduleId, Position)>, StoreError> {
        let rows = sqlx::query_as("SELECT day_schedule_id, day_order FROM day_schedules WHERE plan_id = $1")
            .bind(plan)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    pub async fn entry_orders(&mut self, day: DayScheduleId) -> Result<Vec<(DayPlaceId, Position)>, StoreError> {
        let rows =
            sqlx::query_as("SELECT day_place_id, index_order FROM day_places WHERE day_schedule_id = $1")
                .bind(day)
                .fetch_all(&mut *self.tx)
                .await?;
        Ok(rows)
    }

    pub async fn insert_day(
        &mut self,
        plan: PlanId,
        title: &str,
        position: Position,
    ) -> Result<DayScheduleId, StoreError> {
        let id = sqlx::query_scalar(
            "INSERT INTO day_schedules (plan_id, day_order, title) VALUES ($1, $2, $3) \
             RETURNING day_schedule_id",
        )
        .bind(plan)
        .bind(position)
        .bind(title)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(id)
    }

    pub async fn rename_day(&mut self, day: DayScheduleId, title: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE day_schedules SET title = $2 WHERE day_schedule_id = $1")
            .bind(day)
            .bind(title)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub async fn set_day_orders(&mut self, orders: &[(DayScheduleId, Position)]) -> Result<(), StoreError> {
        for (day, position) in orders {
            sqlx::query("UPDATE day_schedules SET day_order = $2 WHERE day_schedule_id = $1")
                .bind(*day)
                .bind(*position)
                .execute(&mut *self.tx)
                .await?;
        }
        Ok(())
    }

    pub async fn delete_day(&mut self, day: DayScheduleId) -> Result<(), StoreError> {
        // day_places rows go with it through ON DELETE CASCADE.
        sqlx::query("DELETE FROM day_schedules WHERE day_schedule_id = $1")
            .bind(day)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub async fn delete_plan(&mut self, plan: PlanId) -> Result<(), StoreError> {
        // Participants, days and their entries cascade; places stay.
        sqlx::query("DELETE FROM plans WHERE plan_id = $1")
            .bind(plan)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub async fn insert_entry(
        &mut self,
        day: DayScheduleId,
        place: PlaceId,
        position: Position,
        memo: Option<&str>,
    ) -> Result<DayPlaceId, StoreError> {
        let id = sqlx::query_scalar(
            "INSERT INTO day_places (day_schedule_id, place_id, index_order, memo) \
             VALUES ($1, $2, $3, $4) RETURNING day_place_id",
        )
        .bind(day)
        .bind(place)
        .bind(position)
        .bind(memo)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(id)
    }

    pub async fn set_memo(&mut self, entry: DayPlaceId, memo: Option<&str>) -> Result<(), StoreError> {
        sqlx::query("UPDATE day_places SET memo = $2 WHERE day_place_id = $1")
            .bind(entry)
            .bind(memo)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub async fn set_entry_orders(&mut self, orders: &[(DayPlaceId, Position)]) -> Result<(), StoreError> {
        for (entry, position) in orders {
            sqlx::query("UPDATE day_places SET index_order = $2 WHERE day_place_id = $1")
                .bind(*entry)
                .bind(*position)
                .execute(&mut *self.tx)
                .await?;
        }
        Ok(())
    }

    pub async fn reparent_entry(
        &mut self,
        entry: DayPlaceId,
        day: DayScheduleId,
        position: Position,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE day_places SET day_schedule_id = $2, index_order = $3 WHERE day_place_id = $1")
            .bind(entry)
            .bind(day)
            .bind(position)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub async fn delete_entry(&mut self, entry: DayPlaceId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM day_places WHERE day_place_id = $1")
            .bind(entry)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        tracing::debug!("[Store] postgres transaction committed");
        Ok(())
    }
}
