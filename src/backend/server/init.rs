/**
 * Server Initialization
 *
 * Builds the application state and router from an `AppConfig`.
 *
 * # Initialization Process
 *
 * 1. Open the database pool, or fall back to the in-memory store
 * 2. Create the scope lock registry and the itinerary service
 * 3. Create the per-plan channel registry
 * 4. Build the router
 * 5. Start the maintenance task
 */

use std::sync::Arc;

use axum::Router;
use tokio::task::JoinHandle;

use crate::backend::itinerary::ItineraryService;
use crate::backend::lock::ScopeLocks;
use crate::backend::realtime::PlanChannels;
use crate::backend::routes::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::backend::store::ItineraryStore;
use crate::shared::AppConfig;

/// Assemble state around an already chosen store
pub fn build_state(config: AppConfig, store: ItineraryStore) -> AppState {
    tracing::info!(
        store = store.backend_name(),
        lock_timeout_ms = config.lock_timeout_ms,
        channel_capacity = config.channel_capacity,
        "[Startup] Building application state"
    );
    let service = ItineraryService::new(store, ScopeLocks::new(), config.lock_timeout());
    let channels = PlanChannels::new(config.channel_capacity);
    AppState {
        service,
        channels,
        config: Arc::new(config),
    }
}

/// Create the router and its state
///
/// The returned state shares every registry with the router, so the caller
/// can shut the channels down when the server stops.
pub async fn create_app(config: AppConfig) -> (Router<()>, AppState) {
    tracing::info!("[Startup] Initializing tripboard backend");

    let store = match load_database(&config).await {
        Some(pool) => ItineraryStore::postgres(pool),
        None => ItineraryStore::memory(),
    };
    let state = build_state(config, store);
    let app = create_router(state.clone());

    spawn_maintenance(&state);
    tracing::info!("[Startup] Router configured with periodic cleanup task");

    (app, state)
}

/// Periodically drop idle channels and lock slots
pub fn spawn_maintenance(state: &AppState) -> JoinHandle<()> {
    let channels = state.channels.clone();
    let locks = state.service.locks().clone();
    let period = state.config.cleanup_interval();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // First tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            let channels_dropped = channels.cleanup_inactive_channels();
            let locks_dropped = locks.prune_idle();
            tracing::debug!(channels_dropped, locks_dropped, "[Maintenance] Cleaned up idle registries");
        }
    })
}
