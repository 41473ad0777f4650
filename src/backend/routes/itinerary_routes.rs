/**
 * Itinerary Route Handlers
 *
 * HTTP surface for plans, days, entries and the ephemeral relays. Every
 * handler receives the caller through the `Caller` extractor, and every
 * plan-scoped handler checks membership before touching anything.
 *
 * # Routes
 *
 * ## Plans and places
 * - `POST /plans` - create a plan owned by the caller
 * - `DELETE /plans/{plan_id}` - owner deletes the plan, its days and entries
 * - `POST /places` - register a visitable place
 * - `POST /plans/{plan_id}/join` - request to join
 * - `POST /plans/{plan_id}/participants/{user_id}/approve` - owner accepts
 * - `POST /plans/{plan_id}/participants/{user_id}/deny` - owner rejects
 *
 * ## Itinerary
 * - `GET /plans/{plan_id}/schedule` - all days with their entries
 * - `GET /plans/{plan_id}/day-schedules/{day_schedule_id}` - one day
 * - `POST /plans/{plan_id}/day-schedules` - day list command
 * - `POST /plans/{plan_id}/day-places` - entry list command
 *
 * ## Relays
 * - `POST /plans/{plan_id}/cursor` - share pointer position
 * - `GET /plans/{plan_id}/events` - SSE stream of the plan's events
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;
use crate::backend::itinerary::{
    apply_day_place_command, apply_day_schedule_command, approve_participant, delete_owned_plan,
    deny_participant, join_plan, relay_cursor, require_participant,
};
use crate::backend::middleware::Caller;
use crate::backend::realtime::handle_plan_subscription;
use crate::backend::server::state::AppState;
use crate::shared::itinerary::{
    DayPlaceCommand, DayScheduleCommand, DayScheduleId, DayScheduleView, NewPlace, ParticipantStatus,
    Place, Plan, PlanId, PlanSchedule, UserId,
};
use crate::shared::RealtimeEvent;

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CursorRequest {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub plan_id: PlanId,
    pub user_id: UserId,
    pub status: ParticipantStatus,
}

pub fn configure_itinerary_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/plans", post(create_plan))
        .route("/plans/{plan_id}", delete(delete_plan))
        .route("/places", post(register_place))
        .route("/plans/{plan_id}/join", post(join))
        .route("/plans/{plan_id}/participants/{user_id}/approve", post(approve))
        .route("/plans/{plan_id}/participants/{user_id}/deny", post(deny))
        .route("/plans/{plan_id}/schedule", get(get_plan_schedule))
        .route("/plans/{plan_id}/day-schedules", post(post_day_schedule_command))
        .route(
            "/plans/{plan_id}/day-schedules/{day_schedule_id}",
            get(get_day_schedule),
        )
        .route("/plans/{plan_id}/day-places", post(post_day_place_command))
        .route("/plans/{plan_id}/cursor", post(post_cursor))
        .route("/plans/{plan_id}/events", get(handle_plan_subscription))
}

pub async fn create_plan(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Json(request): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<Plan>), BackendError> {
    let plan = app_state.service.create_plan(&request.title, user).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn delete_plan(
    State(app_state): State<AppState>,
    Caller(owner): Caller,
    Path(plan): Path<PlanId>,
) -> Result<Json<RealtimeEvent>, BackendError> {
    let event = delete_owned_plan(&app_state.service, &app_state.channels, plan, owner).await?;
    Ok(Json(event))
}

pub async fn register_place(
    State(app_state): State<AppState>,
    Caller(_user): Caller,
    Json(place): Json<NewPlace>,
) -> Result<(StatusCode, Json<Place>), BackendError> {
    let place = app_state.service.register_place(place).await?;
    Ok((StatusCode::CREATED, Json(place)))
}

pub async fn join(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Path(plan): Path<PlanId>,
) -> Result<Json<MembershipResponse>, BackendError> {
    let status = join_plan(&app_state.service, plan, user).await?;
    Ok(Json(MembershipResponse {
        plan_id: plan,
        user_id: user,
        status,
    }))
}

pub async fn approve(
    State(app_state): State<AppState>,
    Caller(owner): Caller,
    Path((plan, applicant)): Path<(PlanId, UserId)>,
) -> Result<StatusCode, BackendError> {
    approve_participant(&app_state.service, plan, owner, applicant).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn deny(
    State(app_state): State<AppState>,
    Caller(owner): Caller,
    Path((plan, applicant)): Path<(PlanId, UserId)>,
) -> Result<StatusCode, BackendError> {
    deny_participant(&app_state.service, plan, owner, applicant).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_plan_schedule(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Path(plan): Path<PlanId>,
) -> Result<Json<PlanSchedule>, BackendError> {
    require_participant(&app_state.service, plan, user).await?;
    Ok(Json(app_state.service.plan_schedule(plan).await?))
}

pub async fn get_day_schedule(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Path((plan, day)): Path<(PlanId, DayScheduleId)>,
) -> Result<Json<DayScheduleView>, BackendError> {
    require_participant(&app_state.service, plan, user).await?;
    Ok(Json(app_state.service.day_schedule(plan, day).await?))
}

/// Apply a day list command and return the event every subscriber received
pub async fn post_day_schedule_command(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Path(plan): Path<PlanId>,
    Json(command): Json<DayScheduleCommand>,
) -> Result<Json<RealtimeEvent>, BackendError> {
    require_participant(&app_state.service, plan, user).await?;
    let event = apply_day_schedule_command(&app_state.service, &app_state.channels, plan, user, command).await?;
    Ok(Json(event))
}

/// Apply an entry list command and return the event every subscriber received
pub async fn post_day_place_command(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Path(plan): Path<PlanId>,
    Json(command): Json<DayPlaceCommand>,
) -> Result<Json<RealtimeEvent>, BackendError> {
    require_participant(&app_state.service, plan, user).await?;
    let event = apply_day_place_command(&app_state.service, &app_state.channels, plan, user, command).await?;
    Ok(Json(event))
}

pub async fn post_cursor(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Path(plan): Path<PlanId>,
    Json(cursor): Json<CursorRequest>,
) -> Result<(StatusCode, Json<RealtimeEvent>), BackendError> {
    require_participant(&app_state.service, plan, user).await?;
    let event = relay_cursor(&app_state.channels, plan, user, cursor.x, cursor.y);
    Ok((StatusCode::ACCEPTED, Json(event)))
}
