//! Route definitions for the reading API

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{create_reading, draw_cards, health, list_aspects, ReadingAppState};

/// Create the reading router
///
/// # Endpoints
///
/// - `GET /api/draw` - Draw three cards
/// - `GET /api/aspects` - List supported aspects
/// - `POST /api/reading` - Interpret a spread
/// - `GET /health` - Liveness probe
pub fn routes() -> Router<ReadingAppState> {
    Router::new()
        .route("/api/draw", get(draw_cards))
        .route("/api/aspects", get(list_aspects))
        .route("/api/reading", post(create_reading))
        .route("/health", get(health))
}

/// Router with state and request tracing attached
pub fn app(state: ReadingAppState) -> Router {
    routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
