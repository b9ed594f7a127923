//! Shared application state for the room server.
//!
//! [`AppState`] owns the one [`Room`] behind a single mutex. Socket tasks
//! never touch the room directly; they go through the methods here, each
//! of which holds the lock for exactly one transition.

use bingo_room::{Broadcaster, Room, RoomRegistry};
use bingo_types::{ClientMessage, ConnectionId, ServerMessage};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard, mpsc};
use tracing::{debug, warn};

use crate::config::RoomConfig;
use crate::protocol;

/// Occupancy counters served by `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomStatus {
    /// Human-readable liveness message.
    pub message: String,
    /// Joined players.
    pub players: usize,
    /// Open connections, joined or not.
    pub connections: usize,
    /// Retained mark history entries.
    pub history: usize,
}

/// Shared state for the Axum application.
///
/// Wrapped in [`std::sync::Arc`] and injected via Axum's `State` extractor.
#[derive(Debug)]
pub struct AppState {
    room: Mutex<Room>,
    max_board_size: usize,
}

impl AppState {
    /// Create the state with an empty room sized by `config`.
    pub fn new(config: &RoomConfig) -> Self {
        let registry = config
            .history_limit
            .map_or_else(RoomRegistry::new, RoomRegistry::with_history_limit);
        Self {
            room: Mutex::new(Room::with_parts(
                registry,
                Broadcaster::with_capacity(config.outbox_capacity),
            )),
            max_board_size: config.max_board_size,
        }
    }

    /// Accept a new connection: assign its id, register its outbox, and
    /// queue `initialState` to it.
    ///
    /// The outbox holds at most `room.outbox_capacity` frames. A connection
    /// that falls that far behind is evicted and its receiver closes.
    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<ServerMessage>) {
        let id = ConnectionId::new();
        let rx = self.room.lock().await.connect(id);
        (id, rx)
    }

    /// Decode and apply one text frame from `id`.
    ///
    /// Malformed frames are logged and dropped; the connection stays open.
    pub async fn handle_frame(&self, id: ConnectionId, text: &str) {
        match protocol::decode(text, self.max_board_size) {
            Ok(msg) => self.dispatch(id, msg).await,
            Err(e) => warn!(connection_id = %id, "Rejected frame: {e}"),
        }
    }

    /// Apply a decoded command from `id`.
    pub async fn dispatch(&self, id: ConnectionId, msg: ClientMessage) {
        let mut room = self.room.lock().await;
        match msg {
            ClientMessage::Join(request) => {
                if let Err(e) = room.join(id, request) {
                    debug!(connection_id = %id, "Join dropped: {e}");
                }
            }
            ClientMessage::MarkCell(request) => {
                room.mark_cell(id, request);
            }
        }
    }

    /// Tear down `id`: remove its player and announce the departure.
    pub async fn disconnect(&self, id: ConnectionId) {
        self.room.lock().await.disconnect(id);
    }

    /// Current occupancy counters.
    pub async fn status(&self) -> RoomStatus {
        let room = self.room.lock().await;
        RoomStatus {
            message: String::from("bingo room server is running"),
            players: room.registry().len(),
            connections: room.connection_count(),
            history: room.registry().history_len(),
        }
    }

    /// Lock the room for direct inspection.
    pub async fn room(&self) -> MutexGuard<'_, Room> {
        self.room.lock().await
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&RoomConfig::default())
    }
}
