//! Axum router construction for the room server.
//!
//! Assembles the socket and status routes into a single [`Router`] with
//! CORS enabled, since the web UI is served from a different origin.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /api/socket` -- `WebSocket` room session
/// - `GET /api/status` -- JSON liveness and occupancy
///
/// Other methods on these paths get `405 Method Not Allowed`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/socket", get(ws::ws_socket))
        .route("/api/status", get(handlers::status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
