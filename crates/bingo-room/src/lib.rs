//! The authoritative state of the bingo room.
//!
//! This crate holds everything the server decides on its own, with no
//! knowledge of sockets:
//!
//! - [`win`] -- Pure bingo detection over a player's mark matrix
//! - [`registry`] -- Who is in the room, their boards, and the mark history
//! - [`broadcast`] -- Per-connection outboxes with isolated fan-out
//! - [`room`] -- The per-connection state machine tying the three together
//! - [`error`] -- Rejection reasons for registry operations
//!
//! # Concurrency
//!
//! [`Room`] is a plain `&mut self` value. The transport wraps exactly one
//! `Room` behind one lock, so every command and the broadcasts it produces
//! happen as a unit relative to other connections.

pub mod broadcast;
pub mod error;
pub mod registry;
pub mod room;
pub mod win;

pub use broadcast::{Broadcaster, DEFAULT_OUTBOX_CAPACITY, Outbox};
pub use error::RoomError;
pub use registry::{RoomRegistry, Toggle};
pub use room::{MarkOutcome, Room, SessionState};
pub use win::{WinLine, evaluate, is_full_house, winning_line};
