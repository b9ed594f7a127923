//! The room registry: players keyed by connection, plus the mark history.
//!
//! # Design
//!
//! - **One entry per connection**: `join` inserts or replaces under the
//!   connection id; `remove` drops it. Replacing keeps the original join
//!   position.
//! - **Insertion-ordered snapshot**: players come back in join order and
//!   history in append order.
//! - **Append-only history**: entries are never modified. With a
//!   `history_limit` the oldest entries are evicted first; without one the
//!   history grows for the life of the process.

use std::collections::{BTreeMap, VecDeque};

use bingo_types::{ConnectionId, InitialState, JoinRequest, MarkEvent, Player};
use chrono::Utc;

use crate::error::RoomError;

/// Result of a successful [`RoomRegistry::toggle_mark`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    /// The player after the toggle.
    pub player: Player,
    /// The cell's new value: `true` if it was just marked.
    pub new_state: bool,
}

/// In-memory table of joined players and their mark history.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    /// Connection id -> player.
    players: BTreeMap<ConnectionId, Player>,
    /// Connection ids in first-join order.
    join_order: Vec<ConnectionId>,
    /// Mark events, oldest first.
    history: VecDeque<MarkEvent>,
    /// Optional cap on `history`.
    history_limit: Option<usize>,
    /// Last timestamp handed out, for non-decreasing stamps.
    last_timestamp: i64,
}

impl RoomRegistry {
    /// Create an empty registry with unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry that keeps at most `limit` history entries.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Register (or re-register) the player for `id`.
    ///
    /// Performs no validation. The mark matrix is sized from
    /// `request.board_size` and starts all-unmarked; `has_won` is reset.
    pub fn join(&mut self, id: ConnectionId, request: JoinRequest) -> Player {
        let player = Player::new(id, request.name, request.board_size, request.board_data);
        if self.players.insert(id, player.clone()).is_none() {
            self.join_order.push(id);
        }
        player
    }

    /// Flip one cell of the player registered under `id`.
    ///
    /// # Errors
    ///
    /// [`RoomError::UnknownPlayer`] if `id` has not joined, or
    /// [`RoomError::CellOutOfRange`] if the cell is off the board. Neither
    /// mutates anything.
    pub fn toggle_mark(
        &mut self,
        id: ConnectionId,
        row: usize,
        col: usize,
    ) -> Result<Toggle, RoomError> {
        let player = self
            .players
            .get_mut(&id)
            .ok_or(RoomError::UnknownPlayer(id))?;
        let board_size = player.board_size;

        let cell = player
            .marked_cells
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or(RoomError::CellOutOfRange {
                row,
                col,
                board_size,
            })?;
        *cell = !*cell;
        let new_state = *cell;

        Ok(Toggle {
            player: player.clone(),
            new_state,
        })
    }

    /// Set `has_won` for `id`.
    ///
    /// Returns `true` only on the `false` -> `true` transition, so callers
    /// announce each winner exactly once.
    pub fn record_win(&mut self, id: ConnectionId) -> bool {
        match self.players.get_mut(&id) {
            Some(player) if !player.has_won => {
                player.has_won = true;
                true
            }
            _ => false,
        }
    }

    /// Drop the player registered under `id`, if any.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Player> {
        let removed = self.players.remove(&id);
        if removed.is_some() {
            self.join_order.retain(|joined| *joined != id);
        }
        removed
    }

    /// Append a mark event, evicting the oldest entry if over the limit.
    pub fn append_history(&mut self, event: MarkEvent) {
        self.history.push_back(event);
        if let Some(limit) = self.history_limit {
            while self.history.len() > limit {
                self.history.pop_front();
            }
        }
    }

    /// Build the history entry for a fresh mark by `player`.
    pub fn mark_event(
        &mut self,
        player: &Player,
        row: usize,
        col: usize,
        cell_text: String,
    ) -> MarkEvent {
        MarkEvent {
            player_id: player.id,
            player_name: player.name.clone(),
            row,
            col,
            cell_text,
            timestamp: self.next_timestamp(),
        }
    }

    /// Current players (join order) and history (append order).
    pub fn snapshot(&self) -> InitialState {
        InitialState {
            players: self
                .join_order
                .iter()
                .filter_map(|id| self.players.get(id))
                .cloned()
                .collect(),
            mark_history: self.history.iter().cloned().collect(),
        }
    }

    /// The player registered under `id`.
    pub fn get(&self, id: ConnectionId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Whether `id` has joined.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.players.contains_key(&id)
    }

    /// Number of joined players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no player has joined.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of retained history entries.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Wall-clock milliseconds, clamped so stamps never go backwards.
    fn next_timestamp(&mut self) -> i64 {
        self.last_timestamp = self.last_timestamp.max(Utc::now().timestamp_millis());
        self.last_timestamp
    }
}
