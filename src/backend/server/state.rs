/**
 * Application State Management
 *
 * `AppState` is the single state container handed to the router. Every
 * field is cheap to clone (an `Arc` or a handle wrapping one), so Axum can
 * clone it per request.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers extract only the part they
 * need, e.g. `State(channels): State<PlanChannels>`.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::itinerary::ItineraryService;
use crate::backend::realtime::PlanChannels;
use crate::shared::AppConfig;

#[derive(Clone)]
pub struct AppState {
    /// Reorder engine bound to storage and scope locks
    pub service: ItineraryService,

    /// Per-plan broadcast channels
    pub channels: PlanChannels,

    pub config: Arc<AppConfig>,
}

impl FromRef<AppState> for ItineraryService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.service.clone()
    }
}

impl FromRef<AppState> for PlanChannels {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.channels.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
