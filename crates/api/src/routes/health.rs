//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health - Component health check.
///
/// A missing geo database degrades rather than fails: events still relay,
/// just without location enrichment.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let geo_loaded = state.geo.is_available();
    let store_connected = state.users.ping().await;

    let status = if store_connected && geo_loaded {
        "ok"
    } else if store_connected {
        "degraded"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        geo_database_loaded: geo_loaded,
        user_store_connected: store_connected,
    })
}

/// GET /health/live - Liveness probe.
pub async fn live_handler() -> StatusCode {
    StatusCode::OK
}
