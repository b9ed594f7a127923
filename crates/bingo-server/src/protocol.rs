//! Decoding inbound frames and encoding outbound ones.
//!
//! The room itself trusts whatever reaches it, so this is where malformed
//! commands stop. A rejected frame is logged by the caller and the
//! connection stays open.

use bingo_types::{ClientMessage, ServerMessage};

/// Why an inbound frame was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The frame was not a well-formed `join` or `markCell` message.
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// A `join` asked for a board larger than the server allows.
    #[error("board size {size} exceeds maximum {max}")]
    BoardTooLarge {
        /// Requested size.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The frame type carries no protocol message (binary).
    #[error("unsupported frame type")]
    UnsupportedFrame,
}

/// Decode one text frame into a client command.
///
/// # Errors
///
/// [`ProtocolError::Json`] for anything that is not a known command with
/// all fields present and well-typed; [`ProtocolError::BoardTooLarge`]
/// for a `join` above `max_board_size`.
pub fn decode(text: &str, max_board_size: usize) -> Result<ClientMessage, ProtocolError> {
    let msg: ClientMessage = serde_json::from_str(text)?;
    if let ClientMessage::Join(req) = &msg {
        if req.board_size > max_board_size {
            return Err(ProtocolError::BoardTooLarge {
                size: req.board_size,
                max: max_board_size,
            });
        }
    }
    Ok(msg)
}

/// Encode a server event as a JSON text frame.
///
/// # Errors
///
/// Returns the serializer error; in practice the message types always
/// serialize.
pub fn encode(msg: &ServerMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}
