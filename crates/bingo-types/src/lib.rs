//! Shared type definitions for the bingo room.
//!
//! This crate is the single source of truth for every type that crosses
//! the socket between the room server and the web UI. Types flow
//! downstream to `TypeScript` via `ts-rs` so the browser client and the
//! server agree on the message catalogue.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for connection identifiers
//! - [`structs`] -- Room entities ([`Player`], [`MarkEvent`]) and payloads
//! - [`messages`] -- Inbound [`ClientMessage`] and outbound [`ServerMessage`]

pub mod ids;
pub mod messages;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::ConnectionId;
pub use messages::{ClientMessage, ServerMessage};
pub use structs::{
    CellUnmarked, InitialState, JoinRequest, MarkCellRequest, MarkEvent, Player, PlayerWon,
};
