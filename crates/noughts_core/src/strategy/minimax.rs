//! Full-depth minimax search.
//!
//! Noughts and crosses is small enough to search to the end of the game from
//! any position (at most 9 plies), so there is no depth limit, no pruning and
//! no transposition table.

use super::Strategy;
use crate::board::Board;
use crate::error::MoveError;
use crate::types::{Cell, GameOutcome, Mark, Move};
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Minimax value of `board` scored for the opponent: +1 opponent wins,
/// -1 player wins, 0 draw, under optimal play from both sides.
pub fn value(board: &Board) -> i8 {
    score_for(board, Mark::Opponent)
}

/// Minimax value of `board` scored for `perspective`.
///
/// The side to move is derived from the board; `perspective` maximizes and
/// the other side minimizes.
pub fn score_for(board: &Board, perspective: Mark) -> i8 {
    match board.outcome() {
        GameOutcome::Draw => 0,
        outcome @ (GameOutcome::PlayerWin | GameOutcome::OpponentWin) => {
            if outcome.winner() == Some(perspective) {
                1
            } else {
                -1
            }
        }
        GameOutcome::InProgress => {
            let mover = board.to_move();
            let scores = board
                .cells()
                .iter()
                .enumerate()
                .filter(|(_, cell)| **cell == Cell::Empty)
                .map(|(i, _)| score_for(&board.place(i, mover), perspective));

            let best = if mover == perspective {
                scores.max()
            } else {
                scores.min()
            };
            // An in-progress board always has an empty cell.
            best.unwrap_or(0)
        }
    }
}

/// Plays the move with the best minimax value for the side to move.
///
/// Ties go to the first move in row-major order (lowest row, then lowest
/// column), so the choice is deterministic.
#[derive(Debug, Clone, Copy)]
pub struct MinimaxStrategy {
    parallel: bool,
}

impl MinimaxStrategy {
    /// Creates a strategy that scores first-ply branches in parallel.
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Creates a strategy that scores every branch on the calling thread.
    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    /// Scores every legal move from `board` for the side to move.
    ///
    /// Results are in row-major order.
    #[instrument(skip(self, board), fields(board = %board.notation(), parallel = self.parallel))]
    pub fn rank_moves(&self, board: &Board) -> Vec<(Move, i8)> {
        let mover = board.to_move();
        let score = |mv: Move| -> Option<(Move, i8)> {
            let index = mv.index()?;
            Some((mv, score_for(&board.place(index, mover), mover)))
        };

        let moves = board.legal_moves();
        if self.parallel {
            moves.into_par_iter().filter_map(score).collect()
        } else {
            moves.into_iter().filter_map(score).collect()
        }
    }
}

impl Default for MinimaxStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for MinimaxStrategy {
    fn choose_move(&self, board: &Board) -> Result<Move, MoveError> {
        let ranked = self.rank_moves(board);

        let mut best: Option<(Move, i8)> = None;
        for (mv, score) in ranked {
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((mv, score));
            }
        }

        let (mv, score) = best.ok_or(MoveError::GameAlreadyOver)?;
        debug!(mv = %mv, score, "Minimax move chosen");
        Ok(mv)
    }

    fn name(&self) -> &'static str {
        "minimax"
    }
}
