//! Room entities and message payloads.
//!
//! Field names serialize in camelCase because the web UI reads them
//! directly (`boardSize`, `markedCells`, `hasWon`, ...).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ConnectionId;

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A joined player and their board, owned by the room registry for the
/// lifetime of the connection.
///
/// `marked_cells` is always `board_size` x `board_size`, regardless of
/// the shape of `board_data` supplied by the client. `has_won` only ever
/// goes from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Player {
    /// The connection this player is bound to.
    pub id: ConnectionId,
    /// Display name chosen by the user.
    pub name: String,
    /// Board dimension N; fixed for the session.
    pub board_size: usize,
    /// N x N cell labels authored before joining. Immutable after join.
    pub board_data: Vec<Vec<String>>,
    /// N x N completion flags, all `false` at join.
    pub marked_cells: Vec<Vec<bool>>,
    /// Whether this player has completed a bingo.
    pub has_won: bool,
}

impl Player {
    /// Build a freshly joined player with an all-unmarked board.
    ///
    /// The mark matrix is sized from `board_size` even when `board_data`
    /// disagrees with it.
    pub fn new(
        id: ConnectionId,
        name: String,
        board_size: usize,
        board_data: Vec<Vec<String>>,
    ) -> Self {
        Self {
            id,
            name,
            board_size,
            board_data,
            marked_cells: vec![vec![false; board_size]; board_size],
            has_won: false,
        }
    }

    /// Whether the cell at (`row`, `col`) is marked. Out-of-range is `false`.
    pub fn is_marked(&self, row: usize, col: usize) -> bool {
        self.marked_cells
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Count of marked cells on the board.
    pub fn marked_count(&self) -> usize {
        self.marked_cells
            .iter()
            .map(|row| row.iter().filter(|marked| **marked).count())
            .sum()
    }
}

// ---------------------------------------------------------------------------
// MarkEvent
// ---------------------------------------------------------------------------

/// One entry of the room's mark history.
///
/// Created only when a cell goes from unmarked to marked. The player name
/// is a snapshot taken when the event was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MarkEvent {
    /// The player who marked the cell.
    pub player_id: ConnectionId,
    /// The player's name at the time of the mark.
    pub player_name: String,
    /// Row of the marked cell.
    pub row: usize,
    /// Column of the marked cell.
    pub col: usize,
    /// Text of the marked cell, as reported by the client.
    pub cell_text: String,
    /// Milliseconds since the Unix epoch; non-decreasing in emission order.
    #[ts(type = "number")]
    pub timestamp: i64,
}

// ---------------------------------------------------------------------------
// Inbound payloads
// ---------------------------------------------------------------------------

/// Payload of the `join` command.
///
/// Any `id` the client sends is ignored; the server binds the player to
/// the connection id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct JoinRequest {
    /// Display name (the UI enforces 2-20 characters).
    pub name: String,
    /// Board dimension N.
    pub board_size: usize,
    /// N x N cell labels.
    pub board_data: Vec<Vec<String>>,
}

/// Payload of the `markCell` command. Toggles the cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MarkCellRequest {
    /// Row of the cell to toggle.
    pub row: usize,
    /// Column of the cell to toggle.
    pub col: usize,
    /// Text of the cell, echoed into the history entry.
    pub cell_text: String,
}

// ---------------------------------------------------------------------------
// Outbound payloads
// ---------------------------------------------------------------------------

/// Full room state sent to a connection right after it connects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct InitialState {
    /// Joined players in join order.
    pub players: Vec<Player>,
    /// Mark history in append order.
    pub mark_history: Vec<MarkEvent>,
}

/// Payload of the `cellUnmarked` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CellUnmarked {
    /// The player whose cell was cleared.
    pub player_id: ConnectionId,
    /// Row of the cleared cell.
    pub row: usize,
    /// Column of the cleared cell.
    pub col: usize,
}

/// Payload of the `playerWon` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlayerWon {
    /// The winner.
    pub player_id: ConnectionId,
    /// The winner's display name.
    pub player_name: String,
}
