//! `WebSocket` handler for the room protocol.
//!
//! Clients connect to `GET /api/socket`. Each connection gets an id and an
//! outbox from [`AppState::connect`]; this task then does two things until
//! the socket closes:
//!
//! - writes every queued room event to the socket as a JSON text frame
//! - feeds every text frame from the client into [`AppState::handle_frame`]
//!
//! When either side ends, the connection is removed from the room.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};

use crate::protocol::{self, ProtocolError};
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` room session.
///
/// # Route
///
/// `GET /api/socket`
pub async fn ws_socket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Run one connection's lifecycle from connect to disconnect.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let (id, mut outbox) = state.connect().await;

    loop {
        tokio::select! {
            // Room event queued for this connection.
            queued = outbox.recv() => {
                let Some(event) = queued else {
                    debug!(connection_id = %id, "Outbox closed");
                    break;
                };
                let json = match protocol::encode(&event) {
                    Ok(j) => j,
                    Err(e) => {
                        warn!(connection_id = %id, "Failed to serialize {}: {e}", event.event_name());
                        continue;
                    }
                };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    debug!(connection_id = %id, "WebSocket client disconnected (send failed)");
                    break;
                }
            }
            // Frame from the client.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        state.handle_frame(id, text.as_str()).await;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        warn!(connection_id = %id, "Rejected frame: {}", ProtocolError::UnsupportedFrame);
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(connection_id = %id, "WebSocket client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(connection_id = %id, "WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        debug!(connection_id = %id, "WebSocket error: {e}");
                        break;
                    }
                    Some(Ok(Message::Pong(_))) => {}
                }
            }
        }
    }

    state.disconnect(id).await;
}
