//! Bingo detection.
//!
//! [`evaluate`] is the predicate the room runs after every new mark. It
//! holds when any of these is complete, checked in this order: a row, a
//! column, the main diagonal, the anti-diagonal, or the whole board
//! ([`is_full_house`]). [`winning_line`] reports which of the four line
//! kinds completed first, for logging.
//!
//! Missing cells (a matrix shorter than `board_size`) count as unmarked,
//! so a malformed matrix can never win or panic. An empty board never wins.

use bingo_types::Player;

/// Which line completed a bingo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinLine {
    /// Every cell of this row is marked.
    Row(usize),
    /// Every cell of this column is marked.
    Column(usize),
    /// The top-left to bottom-right diagonal is marked.
    Diagonal,
    /// The top-right to bottom-left diagonal is marked.
    AntiDiagonal,
}

/// Whether `player` has a completed bingo.
pub fn evaluate(player: &Player) -> bool {
    winning_line(&player.marked_cells, player.board_size).is_some()
        || is_full_house(&player.marked_cells, player.board_size)
}

/// Find the first completed line on a `board_size` x `board_size` matrix.
pub fn winning_line(marked: &[Vec<bool>], board_size: usize) -> Option<WinLine> {
    if board_size == 0 {
        return None;
    }

    let cell = |row: usize, col: usize| is_marked(marked, row, col);

    if let Some(row) = (0..board_size).find(|&r| (0..board_size).all(|c| cell(r, c))) {
        return Some(WinLine::Row(row));
    }

    if let Some(col) = (0..board_size).find(|&c| (0..board_size).all(|r| cell(r, c))) {
        return Some(WinLine::Column(col));
    }

    if (0..board_size).all(|i| cell(i, i)) {
        return Some(WinLine::Diagonal);
    }

    // i < board_size, so board_size - 1 - i never underflows.
    if (0..board_size).all(|i| cell(i, board_size.saturating_sub(1).saturating_sub(i))) {
        return Some(WinLine::AntiDiagonal);
    }

    None
}

/// Whether every cell of a `board_size` x `board_size` matrix is marked.
///
/// Any full board also completes row 0, so this never changes the outcome
/// of [`evaluate`] on its own.
pub fn is_full_house(marked: &[Vec<bool>], board_size: usize) -> bool {
    board_size > 0
        && (0..board_size).all(|r| (0..board_size).all(|c| is_marked(marked, r, c)))
}

fn is_marked(marked: &[Vec<bool>], row: usize, col: usize) -> bool {
    marked
        .get(row)
        .and_then(|cells| cells.get(col))
        .copied()
        .unwrap_or(false)
}
