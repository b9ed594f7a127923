//! The room: registry, win check, and broadcaster behind one `&mut self`.
//!
//! Each method is one transition of a connection's lifecycle:
//!
//! ```text
//! connect ──► Connected ──join──► Joined ──markCell──► Joined
//!                │                  │
//!                └──── disconnect ──┴──► Disconnected (terminal)
//! ```
//!
//! Every method finishes its registry mutation and queues all resulting
//! events before returning, so a caller holding the room's lock makes the
//! whole transition atomic relative to other connections.

use bingo_types::{
    CellUnmarked, ConnectionId, JoinRequest, MarkCellRequest, Player, PlayerWon, ServerMessage,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::broadcast::Broadcaster;
use crate::error::RoomError;
use crate::registry::RoomRegistry;
use crate::win;

/// Where a connection is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected and receiving broadcasts, no board yet.
    Connected,
    /// Joined with a board.
    Joined,
    /// Gone, or never seen.
    Disconnected,
}

/// What a `markCell` command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The cell was marked; `won` is set if this mark produced the
    /// player's first bingo.
    Marked {
        /// Whether `playerWon` was broadcast.
        won: bool,
    },
    /// The cell was unmarked.
    Unmarked,
    /// The command was dropped without any state change.
    Rejected,
}

/// The single shared bingo room.
#[derive(Debug, Default)]
pub struct Room {
    registry: RoomRegistry,
    broadcaster: Broadcaster,
}

impl Room {
    /// Create an empty room with unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty room around an existing registry.
    pub fn with_registry(registry: RoomRegistry) -> Self {
        Self::with_parts(registry, Broadcaster::new())
    }

    /// Create a room from a registry and a broadcaster (for a custom
    /// outbox capacity).
    pub const fn with_parts(registry: RoomRegistry, broadcaster: Broadcaster) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// Accept a new connection.
    ///
    /// Registers its outbox and queues `initialState` to it alone, so the
    /// snapshot and the subsequent broadcasts line up with no gap.
    pub fn connect(&mut self, id: ConnectionId) -> mpsc::Receiver<ServerMessage> {
        let rx = self.broadcaster.register(id);
        let snapshot = self.registry.snapshot();
        info!(
            connection_id = %id,
            players = snapshot.players.len(),
            history = snapshot.mark_history.len(),
            "Connection opened"
        );
        self.broadcaster
            .unicast(id, ServerMessage::InitialState(snapshot));
        rx
    }

    /// Handle `join`: create or replace the player and announce it to all.
    ///
    /// # Errors
    ///
    /// [`RoomError::NotConnected`] if `id` was never connected or has
    /// already disconnected.
    pub fn join(&mut self, id: ConnectionId, request: JoinRequest) -> Result<Player, RoomError> {
        if !self.broadcaster.is_registered(id) {
            warn!(connection_id = %id, "Join from unknown connection ignored");
            return Err(RoomError::NotConnected(id));
        }

        let player = self.registry.join(id, request);
        info!(
            connection_id = %id,
            player = player.name,
            board_size = player.board_size,
            "Player joined"
        );
        self.broadcaster
            .broadcast(&ServerMessage::PlayerJoined(player.clone()));
        Ok(player)
    }

    /// Handle `markCell`: toggle the cell, then announce and check for a win.
    ///
    /// Unknown players and off-board cells are dropped silently.
    pub fn mark_cell(&mut self, id: ConnectionId, request: MarkCellRequest) -> MarkOutcome {
        let MarkCellRequest {
            row,
            col,
            cell_text,
        } = request;

        let toggle = match self.registry.toggle_mark(id, row, col) {
            Ok(toggle) => toggle,
            Err(e @ RoomError::UnknownPlayer(_)) => {
                debug!(connection_id = %id, "Mark ignored: {e}");
                return MarkOutcome::Rejected;
            }
            Err(e) => {
                warn!(connection_id = %id, "Mark rejected: {e}");
                return MarkOutcome::Rejected;
            }
        };

        if !toggle.new_state {
            debug!(connection_id = %id, row, col, "Cell unmarked");
            self.broadcaster
                .broadcast(&ServerMessage::CellUnmarked(CellUnmarked {
                    player_id: id,
                    row,
                    col,
                }));
            return MarkOutcome::Unmarked;
        }

        let event = self.registry.mark_event(&toggle.player, row, col, cell_text);
        debug!(connection_id = %id, row, col, cell = event.cell_text, "Cell marked");
        self.registry.append_history(event.clone());
        self.broadcaster.broadcast(&ServerMessage::CellMarked(event));

        let won = win::evaluate(&toggle.player) && self.registry.record_win(id);
        if won {
            let line = win::winning_line(&toggle.player.marked_cells, toggle.player.board_size);
            info!(connection_id = %id, player = toggle.player.name, ?line, "Player won");
            self.broadcaster
                .broadcast(&ServerMessage::PlayerWon(PlayerWon {
                    player_id: id,
                    player_name: toggle.player.name,
                }));
        }

        MarkOutcome::Marked { won }
    }

    /// Handle a closed connection: forget the player and tell the others.
    ///
    /// History entries by this player are kept. Safe to call for an id
    /// that never joined or was already removed. A connection evicted for
    /// a stalled outbox still gets its `playerLeft` here.
    pub fn disconnect(&mut self, id: ConnectionId) {
        let was_connected = self.broadcaster.unregister(id);
        let removed = self.registry.remove(id);
        if !was_connected && removed.is_none() {
            debug!(connection_id = %id, "Disconnect for unknown connection");
            return;
        }

        info!(
            connection_id = %id,
            player = removed.as_ref().map(|p| p.name.as_str()),
            "Connection closed"
        );
        self.broadcaster.broadcast(&ServerMessage::PlayerLeft(id));
    }

    /// Where `id` is in its lifecycle.
    pub fn session_state(&self, id: ConnectionId) -> SessionState {
        if self.registry.contains(id) {
            SessionState::Joined
        } else if self.broadcaster.is_registered(id) {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    /// Read access to the player table and history.
    pub const fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Number of live connections, joined or not.
    pub fn connection_count(&self) -> usize {
        self.broadcaster.len()
    }
}
