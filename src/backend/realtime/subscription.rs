/**
 * Plan Event Subscription Handler
 *
 * Server-Sent Events stream of everything published on one plan's channel:
 * committed day and entry changes, drag previews and cursor positions.
 *
 * # Event Filtering
 *
 * Clients can filter events by type using the `types` query parameter:
 * - `?types=day_schedule,day_place` - committed changes only
 * - `?types=cursor` - cursor positions only
 * - No parameter - all event types
 *
 * An unknown type name is rejected with 400.
 *
 * # Connection Management
 *
 * - Connections are kept alive using the SSE keep-alive mechanism
 * - Each SSE event carries the event type as its name and the event id
 * - Lagged events are logged and skipped, the connection stays open
 * - The stream ends when the channel registry shuts down
 */

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_stream::Stream;

use crate::backend::error::BackendError;
use crate::backend::itinerary::require_participant;
use crate::backend::middleware::Caller;
use crate::backend::server::state::AppState;
use crate::shared::itinerary::PlanId;
use crate::shared::{EventType, RealtimeEvent};

/// Handle plan subscription (GET /plans/{plan_id}/events)
///
/// # Errors
///
/// * `401 Unauthorized` - no caller identity
/// * `403 Forbidden` - caller is not an approved participant
/// * `404 Not Found` - unknown plan
/// * `400 Bad Request` - unknown event type in `types`
///
/// # Example Response
///
/// ```http
/// HTTP/1.1 200 OK
/// Content-Type: text/event-stream
///
/// event: day_place
/// id: 6f1c...
/// data: {"event_id":"6f1c...","plan_id":1,"event_type":"day_place","payload":{...}}
/// ```
pub async fn handle_plan_subscription(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Path(plan): Path<PlanId>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, BackendError> {
    require_participant(&app_state.service, plan, user).await?;
    let filter = parse_event_types(query.get("types").map(String::as_str))?;

    match &filter {
        Some(types) => tracing::info!(%plan, %user, ?types, "[Realtime] Subscription filtered by type"),
        None => tracing::info!(%plan, %user, "[Realtime] Subscribing to all event types"),
    }

    let stream = event_stream(app_state.channels.subscribe(plan), filter);
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Parse a comma-separated `types` filter
///
/// `None` or an empty list means every type.
pub fn parse_event_types(raw: Option<&str>) -> Result<Option<Vec<EventType>>, BackendError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let mut types = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let event_type = EventType::parse(name).ok_or_else(|| {
            BackendError::handler(StatusCode::BAD_REQUEST, format!("unknown event type: {name}"))
        })?;
        if !types.contains(&event_type) {
            types.push(event_type);
        }
    }

    Ok((!types.is_empty()).then_some(types))
}

/// Turn a channel receiver into a stream of SSE events
pub fn event_stream(
    receiver: broadcast::Receiver<RealtimeEvent>,
    filter: Option<Vec<EventType>>,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    stream::unfold((receiver, filter), |(mut rx, filter)| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let event_type = event.event_type();
                    if filter.as_ref().is_some_and(|types| !types.contains(&event_type)) {
                        continue;
                    }

                    let data = match serde_json::to_string(&event) {
                        Ok(data) => data,
                        Err(err) => {
                            tracing::error!(%err, "[Realtime] Failed to serialize event");
                            continue;
                        }
                    };

                    let sse_event = Event::default()
                        .event(event_type.as_str())
                        .id(event.event_id.to_string())
                        .data(data);
                    return Some((Ok(sse_event), (rx, filter)));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] Receiver lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => {
                    tracing::info!("[Realtime] Plan channel closed, ending stream");
                    return None;
                }
            }
        }
    })
}
