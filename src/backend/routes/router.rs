/**
 * Router Configuration
 *
 * Combines the itinerary routes, the health check and the request tracing
 * layer into one Axum router.
 */

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::backend::routes::itinerary_routes::configure_itinerary_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// - `GET /health` - liveness check, answers `ok`
/// - everything listed in `itinerary_routes`
/// - unknown paths answer 404
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(health));
    let router = configure_itinerary_routes(router);

    router
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

async fn health() -> &'static str {
    "ok"
}
