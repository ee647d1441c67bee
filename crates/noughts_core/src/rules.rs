//! Terminal-state evaluation.
//!
//! Every line is checked on every call. The board is fixed at 3x3 so this is
//! constant time, and it keeps the predicate independent of the last move so
//! the search can use it on any board.

use crate::board::Board;
use crate::types::{Cell, GameOutcome, Mark};
use tracing::instrument;

/// All 8 winning lines as row-major indices.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns true if `mark` fills any complete line.
pub fn has_won(board: &Board, mark: Mark) -> bool {
    let cells = board.cells();
    LINES
        .iter()
        .any(|line| line.iter().all(|&i| cells[i] == Cell::Marked(mark)))
}

/// Classifies a board.
///
/// A player line wins over an opponent line; a board with both cannot be
/// reached through legal play.
#[instrument(level = "trace", skip(board), fields(board = %board.notation()))]
pub fn evaluate(board: &Board) -> GameOutcome {
    if has_won(board, Mark::Player) {
        GameOutcome::PlayerWin
    } else if has_won(board, Mark::Opponent) {
        GameOutcome::OpponentWin
    } else if board.is_full() {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}
