//! Error types for room operations.
//!
//! None of these are fatal. The [`Room`](crate::Room) turns each one
//! into a logged no-op for the offending command.

use bingo_types::ConnectionId;

/// Reasons a registry operation was rejected without mutating state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The connection has not joined (or has already left).
    #[error("no player registered for connection {0}")]
    UnknownPlayer(ConnectionId),

    /// The requested cell lies outside the player's board.
    #[error("cell ({row}, {col}) is outside a {board_size}x{board_size} board")]
    CellOutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// The player's board dimension.
        board_size: usize,
    },

    /// The connection is not registered with the room.
    #[error("connection {0} is not connected")]
    NotConnected(ConnectionId),
}
