//! The socket message catalogue.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`
//! with camelCase event names, mirroring the named events the web UI
//! listens for.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::ConnectionId;
use crate::structs::{
    CellUnmarked, InitialState, JoinRequest, MarkCellRequest, MarkEvent, Player, PlayerWon,
};

/// Commands a client may send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum ClientMessage {
    /// Join the room with a board.
    Join(JoinRequest),
    /// Toggle one cell of the sender's board.
    MarkCell(MarkCellRequest),
}

/// Events the server sends, to one connection or to all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum ServerMessage {
    /// Room snapshot, unicast to a connection when it connects.
    InitialState(InitialState),
    /// A player joined (or re-joined on the same connection).
    PlayerJoined(Player),
    /// A player's connection closed.
    PlayerLeft(ConnectionId),
    /// A cell went from unmarked to marked.
    CellMarked(MarkEvent),
    /// A cell went from marked to unmarked.
    CellUnmarked(CellUnmarked),
    /// A player completed a bingo for the first time.
    PlayerWon(PlayerWon),
}

impl ServerMessage {
    /// The wire name of this event, for logging.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::InitialState(_) => "initialState",
            Self::PlayerJoined(_) => "playerJoined",
            Self::PlayerLeft(_) => "playerLeft",
            Self::CellMarked(_) => "cellMarked",
            Self::CellUnmarked(_) => "cellUnmarked",
            Self::PlayerWon(_) => "playerWon",
        }
    }
}
