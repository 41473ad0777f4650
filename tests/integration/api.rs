//! HTTP API tests against the full router over the memory store

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};

use crate::common::{memory_state, new_place, OWNER};
use tripboard::backend::routes::create_router;
use tripboard::backend::server::AppState;
use tripboard::shared::itinerary::{DayScheduleView, Place, Plan, PlanSchedule, UserId};
use tripboard::shared::{EventType, RealtimeEvent};

const USER_ID: HeaderName = HeaderName::from_static("x-user-id");

fn as_user(user: UserId) -> HeaderValue {
    HeaderValue::from(user.get())
}

struct Api {
    server: TestServer,
    state: AppState,
}

impl Api {
    fn new() -> Self {
        let state = memory_state();
        let server = TestServer::new(create_router(state.clone())).expect("test server");
        Self { server, state }
    }

    async fn post(&self, user: UserId, path: &str, body: Value) -> TestResponse {
        self.server
            .post(path)
            .add_header(USER_ID, as_user(user))
            .json(&body)
            .await
    }

    async fn delete(&self, user: UserId, path: &str) -> TestResponse {
        self.server.delete(path).add_header(USER_ID, as_user(user)).await
    }

    async fn get(&self, user: UserId, path: &str) -> TestResponse {
        self.server.get(path).add_header(USER_ID, as_user(user)).await
    }

    async fn create_plan(&self) -> Plan {
        let response = self.post(OWNER, "/plans", json!({ "title": "Jeju" })).await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        response.json::<Plan>()
    }

    async fn create_day(&self, plan: &Plan, title: &str) -> RealtimeEvent {
        let response = self
            .post(
                OWNER,
                &format!("/plans/{}/day-schedules", plan.plan_id.get()),
                json!({ "action": "CREATE", "title": title }),
            )
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        response.json::<RealtimeEvent>()
    }
}

fn error_kind(response: &TestResponse) -> String {
    response.json::<Value>()["kind"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_health() {
    let api = Api::new();
    let response = api.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let api = Api::new();
    let response = api.server.post("/plans").json(&json!({ "title": "Jeju" })).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(&response), "unauthorized");
}

#[tokio::test]
async fn test_create_and_read_schedule() {
    let api = Api::new();
    let plan = api.create_plan().await;
    let event = api.create_day(&plan, "Arrival").await;
    assert_eq!(event.event_type(), EventType::DaySchedule);
    assert_eq!(event.sender, Some(OWNER));

    let response = api.get(OWNER, &format!("/plans/{}/schedule", plan.plan_id.get())).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let schedule = response.json::<PlanSchedule>();
    assert_eq!(schedule.days.len(), 1);
    assert_eq!(schedule.days[0].title, "Arrival");
    assert_eq!(schedule.days[0].day_order, 1);

    let day = schedule.days[0].day_schedule_id;
    let response = api
        .get(
            OWNER,
            &format!("/plans/{}/day-schedules/{}", plan.plan_id.get(), day.get()),
        )
        .await;
    assert_eq!(response.json::<DayScheduleView>().day_schedule_id, day);
}

#[tokio::test]
async fn test_day_place_commands_and_conflict() {
    let api = Api::new();
    let plan = api.create_plan().await;
    api.create_day(&plan, "Day 1").await;
    let day = api.state.service.plan_schedule(plan.plan_id).await.unwrap().days[0].day_schedule_id;

    let response = api.post(OWNER, "/places", serde_json::to_value(new_place("Hallasan")).unwrap()).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let place = response.json::<Place>();

    let path = format!("/plans/{}/day-places", plan.plan_id.get());
    for _ in 0..3 {
        let response = api
            .post(
                OWNER,
                &path,
                json!({
                    "action": "CREATE",
                    "day_schedule_id": day.get(),
                    "place_id": place.place_id.get(),
                }),
            )
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
    let entries = api.state.service.day_schedule(plan.plan_id, day).await.unwrap().places;
    let last = entries[2].day_place_id;

    let move_last_first = json!({
        "action": "UPDATE_INNER",
        "day_schedule_id": day.get(),
        "day_place_id": last.get(),
        "index_order": 3,
        "modified_index_order": 1,
    });
    let response = api.post(OWNER, &path, move_last_first.clone()).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["event_type"], "day_place");
    assert_eq!(body["payload"]["action"], "UPDATE_INNER");
    assert_eq!(body["payload"]["order"][0]["id"], last.get());

    // Same request again carries a stale position
    let response = api.post(OWNER, &path, move_last_first).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["kind"], "conflict");
    assert_eq!(body["retriable"], true);
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .starts_with("someone else just changed this"));
}

#[tokio::test]
async fn test_error_statuses() {
    let api = Api::new();
    let plan = api.create_plan().await;
    api.create_day(&plan, "Day 1").await;
    let days_path = format!("/plans/{}/day-schedules", plan.plan_id.get());
    let day = api.state.service.plan_schedule(plan.plan_id).await.unwrap().days[0].day_schedule_id;

    let response = api
        .post(
            OWNER,
            &days_path,
            json!({ "action": "UPDATE_SCHEDULE", "day_schedule_id": day.get(), "day_order": 1, "modified_day_order": 4 }),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&response), "invalid_position");

    let response = api
        .post(OWNER, &days_path, json!({ "action": "DELETE", "day_schedule_id": 999_999 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = api
        .post(OWNER, &days_path, json!({ "action": "CREATE", "title": "   " }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(error_kind(&response), "validation");

    let response = api.get(OWNER, "/plans/424242/schedule").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_membership_gate() {
    let api = Api::new();
    let plan = api.create_plan().await;
    let guest = UserId(77);
    let schedule_path = format!("/plans/{}/schedule", plan.plan_id.get());

    let response = api.get(guest, &schedule_path).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = api
        .post(guest, &format!("/plans/{}/join", plan.plan_id.get()), json!({}))
        .await;
    assert_eq!(response.json::<Value>()["status"], "pending");
    assert_eq!(api.get(guest, &schedule_path).await.status_code(), StatusCode::FORBIDDEN);

    let approve = format!("/plans/{}/participants/{}/approve", plan.plan_id.get(), guest.get());
    let response = api.post(guest, &approve, json!({})).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = api.post(OWNER, &approve, json!({})).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(api.get(guest, &schedule_path).await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_cursor_relay_is_accepted_and_published() {
    let api = Api::new();
    let plan = api.create_plan().await;
    let mut rx = api.state.channels.subscribe(plan.plan_id);

    let response = api
        .post(
            OWNER,
            &format!("/plans/{}/cursor", plan.plan_id.get()),
            json!({ "x": 120.5, "y": 48.0 }),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type(), EventType::Cursor);
    assert_eq!(event, response.json::<RealtimeEvent>());
}

#[tokio::test]
async fn test_subscription_rejects_strangers_and_unknown_types() {
    let api = Api::new();
    let plan = api.create_plan().await;
    let events = format!("/plans/{}/events", plan.plan_id.get());

    let response = api.get(UserId(5), &events).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = api.get(OWNER, &format!("{events}?types=message")).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_only_owner_deletes_plan() {
    let api = Api::new();
    let plan = api.create_plan().await;
    api.create_day(&plan, "Day 1").await;
    let guest = UserId(8);
    api.post(guest, &format!("/plans/{}/join", plan.plan_id.get()), json!({})).await;
    api.post(
        OWNER,
        &format!("/plans/{}/participants/{}/approve", plan.plan_id.get(), guest.get()),
        json!({}),
    )
    .await;
    let plan_path = format!("/plans/{}", plan.plan_id.get());
    let schedule_path = format!("{plan_path}/schedule");

    let response = api.delete(guest, &plan_path).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(api.get(guest, &schedule_path).await.status_code(), StatusCode::OK);

    let response = api.delete(OWNER, &plan_path).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["event_type"], "plan");
    assert_eq!(body["payload"]["action"], "DELETE");
    assert_eq!(body["payload"]["day_schedule_ids"].as_array().map(Vec::len), Some(1));

    assert_eq!(api.get(OWNER, &schedule_path).await.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(api.delete(OWNER, &plan_path).await.status_code(), StatusCode::NOT_FOUND);
}
