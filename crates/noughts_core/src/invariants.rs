//! First-class board invariants.
//!
//! Invariants are logical properties every board reachable through legal play
//! satisfies. They are checked in debug builds after each move and can be
//! tested on their own.

use crate::board::Board;
use crate::rules::has_won;
use crate::types::Mark;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Invariant: the player moves first and the sides alternate.
///
/// The player has as many marks as the opponent, or exactly one more.
pub struct TurnBalance;

impl Invariant<Board> for TurnBalance {
    fn holds(board: &Board) -> bool {
        let player = board.count(Mark::Player);
        let opponent = board.count(Mark::Opponent);
        player == opponent || player == opponent + 1
    }

    fn description() -> &'static str {
        "Player marks equal opponent marks or exceed them by one"
    }
}

/// Invariant: at most one side has a completed line.
pub struct ExclusiveWinner;

impl Invariant<Board> for ExclusiveWinner {
    fn holds(board: &Board) -> bool {
        !(has_won(board, Mark::Player) && has_won(board, Mark::Opponent))
    }

    fn description() -> &'static str {
        "Player and opponent cannot both complete a line"
    }
}
