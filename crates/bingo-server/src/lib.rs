//! Room server for multiplayer bingo.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/api/socket`) carrying the room protocol:
//!   `join` and `markCell` in; `initialState`, `playerJoined`,
//!   `playerLeft`, `cellMarked`, `cellUnmarked`, `playerWon` out
//! - **Status endpoint** (`/api/status`) reporting room occupancy
//!
//! # Architecture
//!
//! A single [`bingo_room::Room`] lives behind one mutex in [`AppState`].
//! Every socket task locks it for the duration of one command, so each
//! registry change and the broadcasts it triggers are atomic relative to
//! other connections. Broadcasts land in per-connection outboxes; each
//! socket task writes its own outbox to the wire, so a slow client only
//! slows itself.

pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use config::{BingoConfig, ConfigError, RoomConfig, ServerConfig};
pub use error::ServerError;
pub use router::build_router;
pub use server::start_server;
pub use state::AppState;
