//! REST handlers.
//!
//! The game itself runs over the socket; HTTP only reports liveness.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::state::{AppState, RoomStatus};

/// Report that the server is up and how full the room is.
///
/// # Route
///
/// `GET /api/status`
pub async fn status(State(state): State<Arc<AppState>>) -> Json<RoomStatus> {
    Json(state.status().await)
}
